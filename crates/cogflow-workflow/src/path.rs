//! Path expressions over JSON envelopes.
//!
//! The orchestration service selects sub-documents with a small dollar/dot
//! syntax (`$`, `$.Payload`, `$.Payload.objects`). Paths are carried verbatim
//! into the rendered definition; [`JsonPath::select`] resolves the same subset
//! locally so routing can be checked without the service.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A path expression such as `$.Payload.objects`.
///
/// Paths are not validated on construction: a malformed path is emitted as-is
/// and only rejected when the service materializes the definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JsonPath(String);

impl JsonPath {
  pub fn new(path: impl Into<String>) -> Self {
    Self(path.into())
  }

  /// The whole document, `$`.
  pub fn root() -> Self {
    Self("$".to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Resolve the path against a document.
  ///
  /// Object fields are matched by name and array elements by numeric index.
  /// Returns `None` when any segment is missing or the path is not of the
  /// `$` / `$.a.b` form.
  pub fn select<'a>(&self, document: &'a Value) -> Option<&'a Value> {
    let rest = self.0.strip_prefix('$')?;
    if rest.is_empty() {
      return Some(document);
    }

    let mut current = document;
    for segment in rest.strip_prefix('.')?.split('.') {
      if segment.is_empty() {
        return None;
      }
      current = match current {
        Value::Object(fields) => fields.get(segment)?,
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
        _ => return None,
      };
    }

    Some(current)
  }
}

impl From<&str> for JsonPath {
  fn from(path: &str) -> Self {
    Self::new(path)
  }
}

impl fmt::Display for JsonPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
