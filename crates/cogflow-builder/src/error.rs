use cogflow_config::Environment;
use cogflow_workflow::WorkflowError;
use thiserror::Error;

/// Errors that can occur while building the workflow graphs.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The environment copies data before publishing but no function was given.
  #[error("environment '{environment}' requires a data_transfer function")]
  MissingDataTransfer { environment: Environment },

  /// A graph failed structural validation.
  #[error("invalid workflow graph: {0}")]
  Workflow(#[from] WorkflowError),
}
