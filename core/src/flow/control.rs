// core/src/flow/control.rs

//! Signals for controlling pipeline flow and the outcome of a run.

/// Returned by a step handler to continue or halt the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt immediately; no further handlers or steps run.
  Stop,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
