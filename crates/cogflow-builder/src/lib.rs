mod builder;
mod error;
mod names;
mod set;

pub use builder::{MAX_CONCURRENCY, WorkflowBuilder};
pub use error::BuildError;
pub use names::{GraphName, states};
pub use set::WorkflowSet;
