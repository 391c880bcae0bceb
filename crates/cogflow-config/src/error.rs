use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("failed to read config {path:?}: {source}")]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },

  /// The config document is not valid JSON or is missing required fields.
  #[error("invalid config: {0}")]
  Parse(#[from] serde_json::Error),

  /// Environment name is not one of dev, stage or prod.
  #[error("unknown environment: {0}")]
  UnknownEnvironment(String),
}
