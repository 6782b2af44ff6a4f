//! Domain types shared by the API client and the sync orchestrator.
//!
//! Records coming back from the remote action API are kept as raw JSON
//! objects; only the normalizer decides which keys matter.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The `name` (URL slug) of a showcase. Used as its id on both instances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowcaseName(pub String);

impl ShowcaseName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShowcaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ShowcaseName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ShowcaseName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The `name` of a dataset (package) associated with a showcase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetName(pub String);

impl DatasetName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DatasetName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DatasetName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Raw record
// ---------------------------------------------------------------------------

/// A showcase exactly as returned by `ckanext_showcase_show`.
///
/// Read-only: nothing in this workspace mutates a record after it has been
/// fetched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowcaseRecord(Map<String, Value>);

impl ShowcaseRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value for `key` as text.
    ///
    /// `null` and missing keys are `None`; strings are returned as-is and any
    /// other JSON value in its serialized form.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn name(&self) -> Option<ShowcaseName> {
        self.text("name").map(ShowcaseName::from)
    }

    /// Tag objects under `tags`; anything that is not an object is skipped.
    pub fn tags(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.0
            .get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Value> for ShowcaseRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn newtype_display() {
        assert_eq!(ShowcaseName::from("maps").to_string(), "maps");
        assert_eq!(DatasetName::from("roads").to_string(), "roads");
    }

    #[test]
    fn text_maps_null_to_none_and_keeps_scalars() {
        let record = ShowcaseRecord::from(json!({
            "title": "Maps",
            "notes": null,
            "num_datasets": 3,
        }));
        assert_eq!(record.text("title").as_deref(), Some("Maps"));
        assert_eq!(record.text("notes"), None);
        assert_eq!(record.text("url"), None);
        assert_eq!(record.text("num_datasets").as_deref(), Some("3"));
    }

    #[test]
    fn tags_skip_non_objects() {
        let record = ShowcaseRecord::from(json!({
            "tags": [{"name": "a"}, "junk", {"name": "b"}],
        }));
        let names: Vec<_> = record
            .tags()
            .filter_map(|t| t.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn non_object_value_becomes_empty_record() {
        let record = ShowcaseRecord::from(json!(["not", "a", "map"]));
        assert!(record.as_map().is_empty());
        assert!(record.name().is_none());
    }

    #[test]
    fn record_deserializes_transparently() {
        let record: ShowcaseRecord =
            serde_json::from_str(r#"{"name": "maps", "state": "active"}"#).expect("parse");
        assert_eq!(record.name(), Some(ShowcaseName::from("maps")));
        assert_eq!(record.text("state").as_deref(), Some("active"));
    }
}
