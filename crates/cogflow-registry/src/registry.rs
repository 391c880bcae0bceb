use async_trait::async_trait;
use cogflow_workflow::StateMachine;

use crate::error::RegistryError;
use crate::record::{RegisteredStateMachine, Registration};

/// Registry of deployed state machines, keyed by name.
#[async_trait]
pub trait StateMachineRegistry: Send + Sync {
  /// Create or update the state machine called `name`.
  ///
  /// Registering an identical definition under the same name must be a no-op
  /// that reports [`RegistrationOutcome::Unchanged`](crate::RegistrationOutcome::Unchanged).
  async fn upsert(
    &self,
    name: &str,
    definition: &StateMachine,
  ) -> Result<Registration, RegistryError>;

  /// Get a registered state machine by name.
  async fn get(&self, name: &str) -> Result<Option<RegisteredStateMachine>, RegistryError>;

  /// List all registered state machines. Entries that cannot be read as
  /// records are skipped.
  async fn list(&self) -> Result<Vec<RegisteredStateMachine>, RegistryError>;

  /// Remove a registered state machine.
  async fn remove(&self, name: &str) -> Result<(), RegistryError>;
}
