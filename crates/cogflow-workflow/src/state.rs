use cogflow_config::{FunctionRef, QueueRef};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::machine::StateMachine;
use crate::path::JsonPath;

const LAMBDA_INVOKE_RESOURCE: &str = "arn:aws:states:::lambda:invoke";
const SQS_SEND_MESSAGE_RESOURCE: &str = "arn:aws:states:::sqs:sendMessage";

/// A state in a state machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum State {
  Task(TaskState),
  Choice(ChoiceState),
  Map(MapState),
  Fail(FailState),
}

impl State {
  /// Names of the states this state can transition to, in declaration order.
  pub fn successors(&self) -> Vec<&str> {
    match self {
      State::Task(task) => task.transition.target().into_iter().collect(),
      State::Map(map) => map.transition.target().into_iter().collect(),
      State::Choice(choice) => choice
        .choices
        .iter()
        .map(|rule| rule.next.as_str())
        .chain(std::iter::once(choice.default.as_str()))
        .collect(),
      State::Fail(_) => Vec::new(),
    }
  }
}

impl From<TaskState> for State {
  fn from(state: TaskState) -> Self {
    State::Task(state)
  }
}

impl From<ChoiceState> for State {
  fn from(state: ChoiceState) -> Self {
    State::Choice(state)
  }
}

impl From<MapState> for State {
  fn from(state: MapState) -> Self {
    State::Map(state)
  }
}

impl From<FailState> for State {
  fn from(state: FailState) -> Self {
    State::Fail(state)
  }
}

/// Where execution continues after a task or map state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
  Next(String),
  End,
}

impl Transition {
  pub fn target(&self) -> Option<&str> {
    match self {
      Transition::Next(name) => Some(name),
      Transition::End => None,
    }
  }
}

impl Serialize for Transition {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    match self {
      Transition::Next(name) => map.serialize_entry("Next", name)?,
      Transition::End => map.serialize_entry("End", &true)?,
    }
    map.end()
  }
}

/// The external resource a task state calls.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResource {
  /// Invoke a compute function with the state input as its payload.
  /// The service wraps the function result as `{"Payload": ...}`.
  InvokeFunction { function: FunctionRef },
  /// Send the selected sub-document as a message to a queue.
  SendMessage {
    queue: QueueRef,
    message_body: JsonPath,
  },
}

impl TaskResource {
  pub fn resource_arn(&self) -> &'static str {
    match self {
      TaskResource::InvokeFunction { .. } => LAMBDA_INVOKE_RESOURCE,
      TaskResource::SendMessage { .. } => SQS_SEND_MESSAGE_RESOURCE,
    }
  }

  pub fn parameters(&self) -> Value {
    match self {
      TaskResource::InvokeFunction { function } => json!({
        "FunctionName": function.function_arn,
        "Payload.$": "$",
      }),
      TaskResource::SendMessage {
        queue,
        message_body,
      } => json!({
        "QueueUrl": queue.queue_url,
        "MessageBody.$": message_body,
      }),
    }
  }
}

impl Serialize for TaskResource {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("Resource", self.resource_arn())?;
    map.serialize_entry("Parameters", &self.parameters())?;
    map.end()
  }
}

/// A state that calls a function or sends a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskState {
  #[serde(flatten)]
  pub resource: TaskResource,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub input_path: Option<JsonPath>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output_path: Option<JsonPath>,
  #[serde(flatten)]
  pub transition: Transition,
}

impl TaskState {
  /// A terminal task invoking `function`.
  pub fn invoke(function: FunctionRef) -> Self {
    Self::with_resource(TaskResource::InvokeFunction { function })
  }

  /// A terminal task sending the sub-document at `message_body` to `queue`.
  pub fn send_message(queue: QueueRef, message_body: JsonPath) -> Self {
    Self::with_resource(TaskResource::SendMessage {
      queue,
      message_body,
    })
  }

  fn with_resource(resource: TaskResource) -> Self {
    Self {
      resource,
      input_path: None,
      output_path: None,
      transition: Transition::End,
    }
  }

  pub fn input_path(mut self, path: impl Into<JsonPath>) -> Self {
    self.input_path = Some(path.into());
    self
  }

  pub fn output_path(mut self, path: impl Into<JsonPath>) -> Self {
    self.output_path = Some(path.into());
    self
  }

  pub fn next(mut self, state: impl Into<String>) -> Self {
    self.transition = Transition::Next(state.into());
    self
  }
}

/// A test applied to the value a choice rule selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Comparison {
  StringEquals(String),
  BooleanEquals(bool),
}

impl Comparison {
  /// Values of a different JSON type never match.
  pub fn matches(&self, value: &Value) -> bool {
    match (self, value) {
      (Comparison::StringEquals(expected), Value::String(actual)) => expected == actual,
      (Comparison::BooleanEquals(expected), Value::Bool(actual)) => expected == actual,
      _ => false,
    }
  }
}

/// One branch of a choice state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoiceRule {
  pub variable: JsonPath,
  #[serde(flatten)]
  pub comparison: Comparison,
  pub next: String,
}

impl ChoiceRule {
  pub fn string_equals(
    variable: impl Into<JsonPath>,
    literal: impl Into<String>,
    next: impl Into<String>,
  ) -> Self {
    Self {
      variable: variable.into(),
      comparison: Comparison::StringEquals(literal.into()),
      next: next.into(),
    }
  }

  pub fn boolean_equals(variable: impl Into<JsonPath>, literal: bool, next: impl Into<String>) -> Self {
    Self {
      variable: variable.into(),
      comparison: Comparison::BooleanEquals(literal),
      next: next.into(),
    }
  }

  /// A missing field never matches.
  pub fn matches(&self, input: &Value) -> bool {
    self
      .variable
      .select(input)
      .is_some_and(|value| self.comparison.matches(value))
  }
}

/// A state that picks the next state from its input.
///
/// The default branch is mandatory, so every input has a destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoiceState {
  pub choices: Vec<ChoiceRule>,
  pub default: String,
}

impl ChoiceState {
  pub fn new(default: impl Into<String>) -> Self {
    Self {
      choices: Vec::new(),
      default: default.into(),
    }
  }

  pub fn when(mut self, rule: ChoiceRule) -> Self {
    self.choices.push(rule);
    self
  }

  /// Name of the state the service would move to for `input`.
  ///
  /// Rules are tried in order; the first match wins, otherwise the default.
  pub fn route(&self, input: &Value) -> &str {
    self
      .choices
      .iter()
      .find(|rule| rule.matches(input))
      .map(|rule| rule.next.as_str())
      .unwrap_or(self.default.as_str())
  }
}

/// A state that runs its iterator once per element of a selected collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapState {
  pub items_path: JsonPath,
  /// Upper bound on parallel iterations, enforced by the service.
  pub max_concurrency: u32,
  pub iterator: StateMachine,
  #[serde(flatten)]
  pub transition: Transition,
}

impl MapState {
  /// A terminal map state.
  pub fn new(items_path: impl Into<JsonPath>, max_concurrency: u32, iterator: StateMachine) -> Self {
    Self {
      items_path: items_path.into(),
      max_concurrency,
      iterator,
      transition: Transition::End,
    }
  }
}

/// A terminal state that fails the execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailState {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cause: Option<String>,
}

impl FailState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn error(mut self, error: impl Into<String>) -> Self {
    self.error = Some(error.into());
    self
  }

  pub fn cause(mut self, cause: impl Into<String>) -> Self {
    self.cause = Some(cause.into());
    self
  }
}
