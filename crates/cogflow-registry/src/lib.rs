mod deploy;
mod error;
mod fs_registry;
mod record;
mod registry;

pub use deploy::register_all;
pub use error::RegistryError;
pub use fs_registry::FsStateMachineRegistry;
pub use record::{
  RegisteredStateMachine, Registration, RegistrationOutcome, definition_digest,
  validate_state_machine_name,
};
pub use registry::StateMachineRegistry;
