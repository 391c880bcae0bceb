use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("duplicate state name: {0}")]
  DuplicateState(String),

  #[error("start state not found: {0}")]
  MissingStartState(String),

  #[error("state '{from}' transitions to unknown state '{to}'")]
  UnknownState { from: String, to: String },

  #[error("state not reachable from the start state: {0}")]
  UnreachableState(String),

  #[error("failed to render state machine: {0}")]
  Render(#[from] serde_json::Error),
}
