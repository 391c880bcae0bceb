use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::ConfigError;
use crate::resources::{ComputeFunctions, Queues};

/// Everything needed to build and register the workflows of one stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
  /// Stack id, used as the prefix of every state machine name.
  pub stack_id: String,
  #[serde(default)]
  pub environment: Environment,
  pub account_id: String,
  pub region: String,
  pub functions: ComputeFunctions,
  pub queues: Queues,
}

impl DeployConfig {
  /// Parse a config from a JSON document.
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Read and parse a JSON config file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_str(&content)
  }

  /// Replace the environment, e.g. from a CLI flag.
  pub fn with_environment(mut self, environment: Environment) -> Self {
    self.environment = environment;
    self
  }
}
