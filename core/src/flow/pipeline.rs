// core/src/flow/pipeline.rs

//! `Pipeline<TData>`: an ordered list of named steps, each with zero or more
//! async handlers sharing one `ContextData<TData>`.

use crate::error::{StoreError, StoreResult};
use crate::flow::context_data::ContextData;
use crate::flow::control::{PipelineControl, PipelineResult};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{event, instrument, span, Instrument, Level};

/// Boxed future produced by a step handler.
pub type StepFuture = Pin<Box<dyn Future<Output = StoreResult<PipelineControl>> + Send>>;

/// A registered step handler.
///
/// Handlers own a clone of the context and must release any lock guard
/// before awaiting.
pub type Handler<TData> = Box<dyn Fn(ContextData<TData>) -> StepFuture + Send + Sync>;

#[derive(Debug, Clone)]
pub struct StepDef {
  pub name: String,
  /// An optional step without handlers is skipped instead of failing the run.
  pub optional: bool,
}

pub struct Pipeline<TData: 'static + Send + Sync> {
  name: String,
  steps: Vec<StepDef>,
  handlers: HashMap<String, Vec<Handler<TData>>>,
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for Pipeline<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("steps", &self.steps)
      .field("handled_steps", &self.handlers.keys().collect::<Vec<_>>())
      .finish()
  }
}

impl<TData: 'static + Send + Sync> Pipeline<TData> {
  /// Creates a pipeline from `(step_name, optional)` pairs, in execution order.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, optional)| StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
      })
      .collect();

    Self {
      name: name.into(),
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(|s| s.name.as_str())
  }

  /// Registers a handler for `step_name`. Handlers of one step run in
  /// registration order.
  pub fn on_root<F>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> StoreResult<()>
  where
    F: Future<Output = StoreResult<PipelineControl>> + Send + 'static,
  {
    if !self.steps.iter().any(|s| s.name == step_name) {
      return Err(StoreError::StepNotFound {
        pipeline: self.name.clone(),
        step_name: step_name.to_string(),
      });
    }
    let handler: Handler<TData> = Box::new(move |ctx_data| Box::pin(handler_fn(ctx_data)));
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
    Ok(())
  }

  /// Runs every step in order against `ctx_data`.
  ///
  /// The first handler error aborts the run and is returned unchanged.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(pipeline = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> StoreResult<PipelineResult> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let handlers = match self.handlers.get(&step_def.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(Level::DEBUG, step = %step_def.name, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step = %step_def.name, "Non-optional step has no handlers.");
          return Err(StoreError::HandlerMissing {
            step_name: step_def.name.clone(),
          });
        }
      };

      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx
      );

      for handler_fn in handlers {
        match handler_fn(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::INFO, step = %step_def.name, "Pipeline stopped by a handler.");
            return Ok(PipelineResult::Stopped);
          }
          Err(e) => {
            event!(Level::WARN, step = %step_def.name, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}
