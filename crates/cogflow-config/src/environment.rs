use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deployment environment.
///
/// Controls the shape of the publication workflow: stage and prod copy data
/// across buckets before publishing, dev publishes in place.
///
/// Config files and command-line flags parse the same way: case-insensitive,
/// surrounding whitespace ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Environment {
  #[default]
  Dev,
  Stage,
  Prod,
}

impl Environment {
  /// Whether the publication workflow starts with a data-transfer step.
  pub fn requires_data_transfer(self) -> bool {
    matches!(self, Environment::Stage | Environment::Prod)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Environment::Dev => "dev",
      Environment::Stage => "stage",
      Environment::Prod => "prod",
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Environment {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "dev" => Ok(Environment::Dev),
      "stage" => Ok(Environment::Stage),
      "prod" => Ok(Environment::Prod),
      other => Err(ConfigError::UnknownEnvironment(other.to_string())),
    }
  }
}

impl TryFrom<String> for Environment {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_requires_data_transfer() {
    assert!(!Environment::Dev.requires_data_transfer());
    assert!(Environment::Stage.requires_data_transfer());
    assert!(Environment::Prod.requires_data_transfer());
  }

  #[test]
  fn test_parse_environment() {
    assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Dev);
    assert_eq!("Stage".parse::<Environment>().unwrap(), Environment::Stage);
    assert_eq!(" prod ".parse::<Environment>().unwrap(), Environment::Prod);
  }

  #[test]
  fn test_parse_unknown_environment() {
    let result = "qa".parse::<Environment>();
    assert!(matches!(result, Err(ConfigError::UnknownEnvironment(name)) if name == "qa"));
  }

  #[test]
  fn test_serde_uses_lowercase_names() {
    let json = serde_json::to_string(&Environment::Stage).unwrap();
    assert_eq!(json, "\"stage\"");

    let parsed: Environment = serde_json::from_str("\"prod\"").unwrap();
    assert_eq!(parsed, Environment::Prod);
  }

  #[test]
  fn test_serde_parses_like_from_str() {
    let parsed: Environment = serde_json::from_str("\"Stage\"").unwrap();
    assert_eq!(parsed, Environment::Stage);

    let parsed: Environment = serde_json::from_str("\" PROD \"").unwrap();
    assert_eq!(parsed, Environment::Prod);

    let result: Result<Environment, _> = serde_json::from_str("\"qa\"");
    let message = result.unwrap_err().to_string();
    assert!(message.contains("qa"), "unexpected error: {}", message);
  }
}
