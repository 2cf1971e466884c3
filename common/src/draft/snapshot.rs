//! Change detection for drafts.
//!
//! A snapshot is the MD5 digest of the canonical JSON form of a draft's
//! saveable parts: identifier, section kind and field values. Object keys are
//! sorted recursively before hashing, so two drafts with the same values
//! produce the same snapshot regardless of the order their keys were written.
//! List order is significant.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::model::section::SectionKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn of(identifier: &str, kind: SectionKind, fields: &Value) -> Self {
        let saveable = json!({
            "identifier": identifier,
            "kind": kind,
            "fields": fields,
        });
        let digest = md5::compute(canonical_json(&saveable).as_bytes());
        Snapshot(format!("{digest:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes `value` with object keys in sorted order at every level.
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::with_capacity(entries.len());
            for (key, value) in entries {
                out.insert(key.clone(), sorted(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_does_not_matter() {
        let a = json!({ "title": "Sale", "size": { "width": "100%", "height": "60px" } });
        let b = json!({ "size": { "height": "60px", "width": "100%" }, "title": "Sale" });
        assert_eq!(
            Snapshot::of("site-1", SectionKind::Carousel, &a),
            Snapshot::of("site-1", SectionKind::Carousel, &b)
        );
    }

    #[test]
    fn list_order_matters() {
        let a = json!({ "slides": [{ "id": "a" }, { "id": "b" }] });
        let b = json!({ "slides": [{ "id": "b" }, { "id": "a" }] });
        assert_ne!(
            Snapshot::of("x", SectionKind::Carousel, &a),
            Snapshot::of("x", SectionKind::Carousel, &b)
        );
    }

    #[test]
    fn identifier_and_kind_are_part_of_the_snapshot() {
        let fields = json!({ "title": "Sale" });
        let base = Snapshot::of("site-1", SectionKind::Carousel, &fields);
        assert_ne!(base, Snapshot::of("site-2", SectionKind::Carousel, &fields));
        assert_ne!(base, Snapshot::of("site-1", SectionKind::Footer, &fields));
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let value = json!({ "b": [{ "z": 1, "a": 2 }], "a": null });
        assert_eq!(canonical_json(&value), r#"{"a":null,"b":[{"a":2,"z":1}]}"#);
    }

    #[test]
    fn snapshot_serializes_as_a_plain_string() {
        let snapshot = Snapshot::of("s", SectionKind::Team, &json!({}));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json.as_str(), Some(snapshot.as_str()));
        assert_eq!(snapshot.as_str().len(), 32);
    }
}
