use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::WorkflowError;
use crate::graph::Graph;
use crate::state::State;

/// A validated state machine ready to be registered.
///
/// States are kept in name order so the rendered definition is stable across
/// builds, which keeps re-registration of an unchanged graph a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateMachine {
  #[serde(skip_serializing_if = "Option::is_none")]
  comment: Option<String>,
  start_at: String,
  states: BTreeMap<String, State>,
}

impl StateMachine {
  pub fn builder() -> StateMachineBuilder {
    StateMachineBuilder::default()
  }

  pub fn comment(&self) -> Option<&str> {
    self.comment.as_deref()
  }

  /// Name of the single entry state.
  pub fn start_at(&self) -> &str {
    &self.start_at
  }

  /// The entry state.
  pub fn entry(&self) -> Option<&State> {
    self.states.get(&self.start_at)
  }

  /// Get a state by name.
  pub fn get_state(&self, name: &str) -> Option<&State> {
    self.states.get(name)
  }

  pub fn states(&self) -> &BTreeMap<String, State> {
    &self.states
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.states)
  }

  /// Render as an Amazon States Language document.
  pub fn to_asl(&self) -> Result<serde_json::Value, WorkflowError> {
    Ok(serde_json::to_value(self)?)
  }

  /// Render as a pretty-printed Amazon States Language document.
  pub fn to_asl_string_pretty(&self) -> Result<String, WorkflowError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// Collects named states and validates them into a [`StateMachine`].
#[derive(Debug, Default)]
pub struct StateMachineBuilder {
  comment: Option<String>,
  states: BTreeMap<String, State>,
}

impl StateMachineBuilder {
  pub fn comment(mut self, comment: impl Into<String>) -> Self {
    self.comment = Some(comment.into());
    self
  }

  /// Add a named state. Names must be unique within one state machine.
  pub fn add_state(
    &mut self,
    name: impl Into<String>,
    state: impl Into<State>,
  ) -> Result<&mut Self, WorkflowError> {
    let name = name.into();
    if self.states.contains_key(&name) {
      return Err(WorkflowError::DuplicateState(name));
    }
    self.states.insert(name, state.into());
    Ok(self)
  }

  /// Validate the collected states and produce a state machine entered at
  /// `start_at`.
  ///
  /// Checks that:
  /// 1. The start state exists
  /// 2. Every transition targets an existing state
  /// 3. Every state is reachable from the start state
  pub fn build(self, start_at: impl Into<String>) -> Result<StateMachine, WorkflowError> {
    let start_at = start_at.into();
    if !self.states.contains_key(&start_at) {
      return Err(WorkflowError::MissingStartState(start_at));
    }

    for (from, state) in &self.states {
      for to in state.successors() {
        if !self.states.contains_key(to) {
          return Err(WorkflowError::UnknownState {
            from: from.clone(),
            to: to.to_string(),
          });
        }
      }
    }

    let reachable = Graph::new(&self.states).reachable_from(&start_at);
    if let Some(orphan) = self.states.keys().find(|name| !reachable.contains(*name)) {
      return Err(WorkflowError::UnreachableState(orphan.clone()));
    }

    Ok(StateMachine {
      comment: self.comment,
      start_at,
      states: self.states,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::{ChoiceRule, ChoiceState, FailState, MapState, TaskState};
  use cogflow_config::{FunctionRef, QueueRef};
  use serde_json::json;

  fn single_task(name: &str) -> StateMachine {
    let mut builder = StateMachine::builder();
    builder
      .add_state(name, TaskState::invoke(FunctionRef::new("arn:fn")))
      .unwrap();
    builder.build(name).unwrap()
  }

  #[test]
  fn test_build_simple_machine() {
    let machine = single_task("Only");

    assert_eq!(machine.start_at(), "Only");
    assert_eq!(machine.states().len(), 1);
    assert!(matches!(machine.entry(), Some(State::Task(_))));
  }

  #[test]
  fn test_build_fails_on_missing_start() {
    let mut builder = StateMachine::builder();
    builder.add_state("A", FailState::new()).unwrap();

    let result = builder.build("B");
    assert!(matches!(result, Err(WorkflowError::MissingStartState(name)) if name == "B"));
  }

  #[test]
  fn test_build_fails_on_unknown_transition() {
    let mut builder = StateMachine::builder();
    builder
      .add_state("A", TaskState::invoke(FunctionRef::new("f")).next("Nowhere"))
      .unwrap();

    let result = builder.build("A");
    assert!(matches!(
      result,
      Err(WorkflowError::UnknownState { from, to }) if from == "A" && to == "Nowhere"
    ));
  }

  #[test]
  fn test_build_fails_on_unknown_choice_default() {
    let mut builder = StateMachine::builder();
    builder
      .add_state(
        "Choose",
        ChoiceState::new("Missing").when(ChoiceRule::string_equals("$.k", "a", "Choose")),
      )
      .unwrap();

    let result = builder.build("Choose");
    assert!(matches!(result, Err(WorkflowError::UnknownState { .. })));
  }

  #[test]
  fn test_build_fails_on_unreachable_state() {
    let mut builder = StateMachine::builder();
    builder
      .add_state("A", TaskState::invoke(FunctionRef::new("f")))
      .unwrap()
      .add_state("Orphan", FailState::new())
      .unwrap();

    let result = builder.build("A");
    assert!(matches!(result, Err(WorkflowError::UnreachableState(name)) if name == "Orphan"));
  }

  #[test]
  fn test_add_state_rejects_duplicates() {
    let mut builder = StateMachine::builder();
    builder.add_state("A", FailState::new()).unwrap();

    let result = builder.add_state("A", FailState::new());
    assert!(matches!(result, Err(WorkflowError::DuplicateState(name)) if name == "A"));
  }

  #[test]
  fn test_render_with_nested_map() {
    let mut iterator = StateMachine::builder();
    iterator
      .add_state(
        "Send",
        TaskState::send_message(QueueRef::new("https://q"), "$".into()),
      )
      .unwrap();
    let iterator = iterator.build("Send").unwrap();

    let mut builder = StateMachine::builder().comment("fan out");
    builder
      .add_state("Fan out", MapState::new("$.items", 10, iterator))
      .unwrap();
    let machine = builder.build("Fan out").unwrap();

    assert_eq!(
      machine.to_asl().unwrap(),
      json!({
        "Comment": "fan out",
        "StartAt": "Fan out",
        "States": {
          "Fan out": {
            "Type": "Map",
            "ItemsPath": "$.items",
            "MaxConcurrency": 10,
            "Iterator": {
              "StartAt": "Send",
              "States": {
                "Send": {
                  "Type": "Task",
                  "Resource": "arn:aws:states:::sqs:sendMessage",
                  "Parameters": { "QueueUrl": "https://q", "MessageBody.$": "$" },
                  "End": true
                }
              }
            },
            "End": true
          }
        }
      })
    );
  }

  #[test]
  fn test_render_is_stable() {
    let a = single_task("Only").to_asl_string_pretty().unwrap();
    let b = single_task("Only").to_asl_string_pretty().unwrap();
    assert_eq!(a, b);
  }
}
