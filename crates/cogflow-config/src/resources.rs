use serde::{Deserialize, Serialize};

/// Reference to a deployed compute function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
  /// Function ARN or name, e.g. "arn:aws:lambda:us-east-1:123456789012:function:cogify"
  pub function_arn: String,
}

impl FunctionRef {
  pub fn new(function_arn: impl Into<String>) -> Self {
    Self {
      function_arn: function_arn.into(),
    }
  }
}

/// Reference to a deployed message queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRef {
  /// Queue URL, e.g. "https://sqs.us-east-1.amazonaws.com/123456789012/cogify"
  pub queue_url: String,
}

impl QueueRef {
  pub fn new(queue_url: impl Into<String>) -> Self {
    Self {
      queue_url: queue_url.into(),
    }
  }
}

/// The compute functions the workflows invoke, by logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeFunctions {
  pub s3_discovery: FunctionRef,
  pub cmr_discovery: FunctionRef,
  pub cogify: FunctionRef,
  pub build_ndjson: FunctionRef,
  pub db_write: FunctionRef,
  /// Only needed in environments that copy data before publishing.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data_transfer: Option<FunctionRef>,
}

/// The queues the workflows send messages to, by logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queues {
  pub cogify_queue: QueueRef,
  pub stac_ready_queue: QueueRef,
}
