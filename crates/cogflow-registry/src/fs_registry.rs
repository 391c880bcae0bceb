use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cogflow_config::state_machine_arn;
use cogflow_workflow::StateMachine;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::record::{
  RegisteredStateMachine, Registration, RegistrationOutcome, definition_digest,
  validate_state_machine_name,
};
use crate::registry::StateMachineRegistry;

const RECORD_EXTENSION: &str = "json";

/// Filesystem-based state machine registry.
///
/// Each state machine is one record file holding its ARN, digest and rendered
/// definition:
/// ```text
/// {root}/
/// ├── my-stack-discover.json
/// ├── my-stack-cogify.json
/// └── my-stack-publication.json
/// ```
pub struct FsStateMachineRegistry {
  root: PathBuf,
  region: String,
  account_id: String,
}

impl FsStateMachineRegistry {
  /// Create a new filesystem registry at the given root path, issuing ARNs
  /// for `region` and `account_id`.
  pub fn new(
    root: impl Into<PathBuf>,
    region: impl Into<String>,
    account_id: impl Into<String>,
  ) -> Self {
    Self {
      root: root.into(),
      region: region.into(),
      account_id: account_id.into(),
    }
  }

  /// Get the root directory of the registry.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn record_path(&self, name: &str) -> PathBuf {
    self.root.join(format!("{}.{}", name, RECORD_EXTENSION))
  }

  async fn read_record(&self, path: &Path) -> Result<RegisteredStateMachine, RegistryError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
  }

  /// Write through a temp file so a crash never leaves a truncated record.
  async fn write_record(&self, record: &RegisteredStateMachine) -> Result<(), RegistryError> {
    fs::create_dir_all(&self.root).await?;

    let target = self.record_path(&record.name);
    let temp = target.with_extension(format!("{}.tmp", RECORD_EXTENSION));
    fs::write(&temp, serde_json::to_string_pretty(record)?).await?;
    fs::rename(&temp, &target).await?;
    Ok(())
  }
}

#[async_trait]
impl StateMachineRegistry for FsStateMachineRegistry {
  async fn upsert(
    &self,
    name: &str,
    definition: &StateMachine,
  ) -> Result<Registration, RegistryError> {
    validate_state_machine_name(name)?;

    let definition = definition.to_asl()?;
    let record = RegisteredStateMachine {
      name: name.to_string(),
      arn: state_machine_arn(&self.region, &self.account_id, name),
      digest: definition_digest(&definition),
      definition,
    };

    let outcome = match self.get(name).await? {
      Some(existing) if existing.digest == record.digest && existing.arn == record.arn => {
        debug!(name = %name, digest = %record.digest, "definition unchanged");
        return Ok(Registration {
          state_machine: existing,
          outcome: RegistrationOutcome::Unchanged,
        });
      }
      Some(_) => RegistrationOutcome::Updated,
      None => RegistrationOutcome::Created,
    };

    self.write_record(&record).await?;
    debug!(name = %name, digest = %record.digest, ?outcome, "wrote definition");

    Ok(Registration {
      state_machine: record,
      outcome,
    })
  }

  async fn get(&self, name: &str) -> Result<Option<RegisteredStateMachine>, RegistryError> {
    validate_state_machine_name(name)?;

    let path = self.record_path(name);
    if !path.exists() {
      return Ok(None);
    }

    Ok(Some(self.read_record(&path).await?))
  }

  async fn list(&self) -> Result<Vec<RegisteredStateMachine>, RegistryError> {
    let mut records = Vec::new();

    if !self.root.exists() {
      return Ok(records);
    }

    let mut entries = fs::read_dir(&self.root).await?;
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      let is_record = path.is_file()
        && path
          .extension()
          .and_then(|ext| ext.to_str())
          .is_some_and(|ext| ext == RECORD_EXTENSION);
      if !is_record {
        continue;
      }

      match self.read_record(&path).await {
        Ok(record) => records.push(record),
        Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable record"),
      }
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(records)
  }

  async fn remove(&self, name: &str) -> Result<(), RegistryError> {
    match self.get(name).await? {
      Some(_) => {
        fs::remove_file(self.record_path(name)).await?;
        Ok(())
      }
      None => Err(RegistryError::NotFound {
        name: name.to_string(),
      }),
    }
  }
}
