use cogflow_workflow::WorkflowError;
use thiserror::Error;

/// Errors that can occur when registering state machines.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// State machine name is empty, too long or has characters outside `[A-Za-z0-9_-]`.
  #[error("invalid state machine name: {name:?}")]
  InvalidName { name: String },

  /// State machine not found in the registry.
  #[error("state machine not found: {name}")]
  NotFound { name: String },

  /// IO error when reading/writing registry files.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Failed to parse a stored registration record.
  #[error("invalid registration record: {0}")]
  InvalidRecord(#[from] serde_json::Error),

  /// The definition could not be rendered.
  #[error("failed to render definition: {0}")]
  Render(#[from] WorkflowError),
}
