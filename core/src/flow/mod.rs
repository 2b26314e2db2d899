// core/src/flow/mod.rs

//! A small step runner: named steps, async handlers over a shared lockable
//! context, early stop, and one tracing span per step.

pub mod context_data;
pub mod control;
pub mod pipeline;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use pipeline::{Handler, Pipeline, StepDef, StepFuture};
