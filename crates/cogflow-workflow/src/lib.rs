//! cogflow Workflow
//!
//! This crate provides the in-memory state machine representation for cogflow.
//! A state machine is a validated graph of task, choice, map and fail states
//! with exactly one entry point, ready to be rendered as an Amazon States
//! Language document and handed to the orchestration service.
//!
//! Key properties:
//! - States are a closed sum type ([`State`]), no trait objects
//! - States are keyed by name; a state with several parents is stored once
//! - Every transition target exists and every state is reachable
//! - Map iterators are nested state machines validated the same way

mod error;
mod graph;
mod machine;
mod path;
mod state;

pub use error::WorkflowError;
pub use graph::Graph;
pub use machine::{StateMachine, StateMachineBuilder};
pub use path::JsonPath;
pub use state::{
  ChoiceRule, ChoiceState, Comparison, FailState, MapState, State, TaskResource, TaskState,
  Transition,
};
