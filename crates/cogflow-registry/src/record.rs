use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RegistryError;

const MAX_NAME_LEN: usize = 80;

/// A state machine as stored by a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredStateMachine {
  /// Registered name, e.g. "my-stack-cogify"
  pub name: String,

  /// State machine ARN derived from the name
  pub arn: String,

  /// SHA-256 digest of the rendered definition, e.g. "sha256:abc123..."
  pub digest: String,

  /// The rendered Amazon States Language document
  pub definition: serde_json::Value,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
  /// No state machine with this name existed.
  Created,
  /// A state machine with this name existed with a different definition.
  Updated,
  /// The stored definition was identical; nothing was written.
  Unchanged,
}

/// Result of registering one state machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
  pub state_machine: RegisteredStateMachine,
  pub outcome: RegistrationOutcome,
}

/// Digest of a rendered definition, over its compact JSON form.
pub fn definition_digest(definition: &serde_json::Value) -> String {
  let mut hasher = Sha256::new();
  hasher.update(definition.to_string().as_bytes());
  format!("sha256:{:x}", hasher.finalize())
}

/// State machine names are 1-80 characters of `[A-Za-z0-9_-]`.
pub fn validate_state_machine_name(name: &str) -> Result<(), RegistryError> {
  let valid = !name.is_empty()
    && name.len() <= MAX_NAME_LEN
    && name
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

  if valid {
    Ok(())
  } else {
    Err(RegistryError::InvalidName {
      name: name.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_digest_is_stable_and_prefixed() {
    let a = definition_digest(&json!({ "StartAt": "A", "States": {} }));
    let b = definition_digest(&json!({ "States": {}, "StartAt": "A" }));

    assert!(a.starts_with("sha256:"));
    assert_eq!(a.len(), "sha256:".len() + 64);
    assert_eq!(a, b);
  }

  #[test]
  fn test_digest_changes_with_definition() {
    let a = definition_digest(&json!({ "StartAt": "A" }));
    let b = definition_digest(&json!({ "StartAt": "B" }));
    assert_ne!(a, b);
  }

  #[test]
  fn test_valid_names() {
    assert!(validate_state_machine_name("my-stack-discover").is_ok());
    assert!(validate_state_machine_name("Stack_1-publication").is_ok());
    assert!(validate_state_machine_name(&"a".repeat(80)).is_ok());
  }

  #[test]
  fn test_invalid_names() {
    for name in ["", "has space", "../escape", "slash/name", "dot.name"] {
      assert!(
        matches!(
          validate_state_machine_name(name),
          Err(RegistryError::InvalidName { .. })
        ),
        "{:?} should be rejected",
        name
      );
    }
    assert!(validate_state_machine_name(&"a".repeat(81)).is_err());
  }
}
