// app/src/errors.rs

use thiserror::Error;

/// Failures that end the program. Store errors are handled per command by
/// the shell and never get here.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Terminal I/O Error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
