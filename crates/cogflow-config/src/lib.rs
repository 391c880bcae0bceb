//! cogflow Config
//!
//! This crate contains the serializable deployment configuration for cogflow.
//! These types describe the externally managed resources (compute functions and
//! queues) the workflow graphs point at, plus the account, region and
//! environment the graphs are deployed into.
//!
//! Configuration is loaded from a JSON file (via CLI with `--config=deploy.json`).
//! The builder takes these types and assembles the state machines from them;
//! nothing here is fetched from the cloud.

mod arn;
mod deploy;
mod environment;
mod error;
mod resources;

pub use arn::state_machine_arn;
pub use deploy::DeployConfig;
pub use environment::Environment;
pub use error::ConfigError;
pub use resources::{ComputeFunctions, FunctionRef, QueueRef, Queues};
