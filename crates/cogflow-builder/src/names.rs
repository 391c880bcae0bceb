use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// State names as they appear in execution histories.
pub mod states {
  pub const DISCOVERY_CHOICE: &str = "Discovery Choice (CMR or S3)";
  pub const S3_DISCOVER: &str = "S3 Discover Task";
  pub const CMR_DISCOVER: &str = "CMR Discover Task";
  pub const UNSUPPORTED_DISCOVERY: &str = "Discovery Type not supported";

  pub const COGIFY_DECISION: &str = "Cogify?";
  pub const QUEUE_TO_COGIFY: &str = "Run concurrent queueing to cogify queue";
  pub const SEND_TO_COGIFY: &str = "Send to Cogify queue";
  pub const QUEUE_TO_STAC_READY: &str = "Run concurrent queueing to stac ready queue";
  pub const SEND_TO_STAC_READY: &str = "Send to stac-ready queue";

  pub const COGIFY_MAP: &str = "Run concurrent cogifications";
  pub const COGIFY: &str = "Cogify";
  pub const SEND_COGIFIED: &str = "Send cogified to stac-ready queue";

  pub const DATA_TRANSFER: &str = "Data Transfer";
  pub const BUILD_NDJSON: &str = "Build Ndjson Task";
  pub const DB_WRITE: &str = "Write to database Task";
}

/// The three workflows of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphName {
  Discovery,
  Cogify,
  Publication,
}

impl GraphName {
  pub const ALL: [GraphName; 3] = [GraphName::Discovery, GraphName::Cogify, GraphName::Publication];

  /// Key used when handing the graphs to callers.
  pub fn key(self) -> &'static str {
    match self {
      GraphName::Discovery => "discovery",
      GraphName::Cogify => "cogify",
      GraphName::Publication => "publication",
    }
  }

  /// Suffix of the registered state machine name.
  ///
  /// Discovery registers as "discover", not "discovery".
  pub fn suffix(self) -> &'static str {
    match self {
      GraphName::Discovery => "discover",
      GraphName::Cogify => "cogify",
      GraphName::Publication => "publication",
    }
  }

  /// Registered name, "{stack_id}-{suffix}".
  pub fn state_machine_name(self, stack_id: &str) -> String {
    format!("{}-{}", stack_id, self.suffix())
  }

  /// Deployment construct id, "{stack_id}-{suffix}-sf".
  pub fn construct_id(self, stack_id: &str) -> String {
    format!("{}-sf", self.state_machine_name(stack_id))
  }
}

impl fmt::Display for GraphName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

impl FromStr for GraphName {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "discovery" | "discover" => Ok(GraphName::Discovery),
      "cogify" => Ok(GraphName::Cogify),
      "publication" => Ok(GraphName::Publication),
      other => Err(format!(
        "unknown graph '{}', expected discovery, cogify or publication",
        other
      )),
    }
  }
}
