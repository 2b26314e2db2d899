// core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the storefront client can report.
///
/// Each user action is terminal on failure: nothing is retried, and the error
/// is surfaced to the caller as-is.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Input rejected before any network call was made.
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Product {product_id} is disabled and cannot be added to the cart")]
  ProductDisabled { product_id: i64 },

  /// Transport-level failure (connection refused, broken body, ...).
  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  /// The API answered with a non-success status.
  #[error("Request to '{path}' failed with status {status}: {body}")]
  Status { path: String, status: u16, body: String },

  /// The API answered with a body that does not describe a valid record.
  #[error("Malformed response from '{path}': {reason}")]
  MalformedResponse { path: String, reason: String },

  #[error("Invalid API base URL '{url}': {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("Session storage error at {}: {source}", path.display())]
  SessionStorage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Session file {} is not valid JSON: {source}", path.display())]
  SessionFormat {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Step not found in pipeline '{pipeline}': {step_name}")]
  StepNotFound { pipeline: String, step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal storefront error: {0}")]
  Internal(String),
}

impl StoreError {
  /// True for errors raised before anything was sent to the API.
  pub fn is_validation(&self) -> bool {
    matches!(self, StoreError::Validation(_) | StoreError::ProductDisabled { .. })
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
