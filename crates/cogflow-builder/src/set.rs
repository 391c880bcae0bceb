use cogflow_workflow::StateMachine;

use crate::names::GraphName;

/// The three state machines of one stack, built together.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSet {
  pub(crate) stack_id: String,
  pub(crate) discovery: StateMachine,
  pub(crate) cogify: StateMachine,
  pub(crate) publication: StateMachine,
}

impl WorkflowSet {
  pub fn stack_id(&self) -> &str {
    &self.stack_id
  }

  pub fn get(&self, graph: GraphName) -> &StateMachine {
    match graph {
      GraphName::Discovery => &self.discovery,
      GraphName::Cogify => &self.cogify,
      GraphName::Publication => &self.publication,
    }
  }

  /// Graphs in registration order: discovery, cogify, publication.
  pub fn iter(&self) -> impl Iterator<Item = (GraphName, &StateMachine)> {
    GraphName::ALL.into_iter().map(|graph| (graph, self.get(graph)))
  }

  /// Registered name of one graph, "{stack_id}-{suffix}".
  pub fn state_machine_name(&self, graph: GraphName) -> String {
    graph.state_machine_name(&self.stack_id)
  }
}
