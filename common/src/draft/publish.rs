//! Hands saved drafts to whatever displays them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::Value;

use super::error::DraftError;
use super::path::FieldPath;
use super::snapshot::Snapshot;
use super::store::FieldStore;
use crate::model::section::SectionKind;

/// Draws a published section. The editor's live layout page implements it;
/// tests record what they receive.
pub trait Renderer {
    fn render(&mut self, kind: SectionKind, identifier: &str, fields: &Value);
}

pub struct PublishGate;

impl PublishGate {
    /// Only drafts saved at least once and unchanged since may be shown.
    pub fn can_publish(saved: Option<&Snapshot>, current: &Snapshot) -> bool {
        saved.is_some_and(|saved| saved == current)
    }

    pub fn publish<R: Renderer + ?Sized>(
        renderer: &mut R,
        kind: SectionKind,
        identifier: &str,
        saved: Option<&Snapshot>,
        current: &Snapshot,
        fields: Value,
    ) -> Result<(), DraftError> {
        if !Self::can_publish(saved, current) {
            return Err(DraftError::UnsavedChanges);
        }
        renderer.render(kind, identifier, &fields);
        log::info!("published {kind} `{identifier}`");
        Ok(())
    }
}

/// `fields` with every server-assigned value written over the local one.
pub fn merged_fields(store: &FieldStore, server_assigned: &BTreeMap<String, String>) -> Value {
    let mut merged = store.clone();
    for (path, value) in server_assigned {
        match FieldPath::from_str(path) {
            Ok(path) => {
                if let Ok(false) = merged.set(&path, Value::String(value.clone())) {
                    log::debug!("server-assigned value for {path} no longer has a field");
                }
            }
            Err(err) => log::warn!("dropping server-assigned value: {err}"),
        }
    }
    merged.fields().clone()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Value>);

    impl Renderer for Recorder {
        fn render(&mut self, _kind: SectionKind, _identifier: &str, fields: &Value) {
            self.0.push(fields.clone());
        }
    }

    #[test]
    fn never_saved_drafts_are_rejected() {
        let current = Snapshot::of("a", SectionKind::Team, &json!({}));
        let mut recorder = Recorder::default();
        let result = PublishGate::publish(&mut recorder, SectionKind::Team, "a", None, &current, json!({}));
        assert_eq!(result, Err(DraftError::UnsavedChanges));
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn saved_and_unchanged_drafts_render() {
        let current = Snapshot::of("a", SectionKind::Team, &json!({}));
        let mut recorder = Recorder::default();
        PublishGate::publish(
            &mut recorder,
            SectionKind::Team,
            "a",
            Some(&current.clone()),
            &current,
            json!({ "heading": "Hi" }),
        )
        .unwrap();
        assert_eq!(recorder.0, [json!({ "heading": "Hi" })]);
    }

    #[test]
    fn server_values_override_local_ones() {
        let store = FieldStore::new(json!({ "slides": [{ "id": "s1", "image": "data:image/png;base64,aGk=" }] }));
        let assigned = BTreeMap::from([
            ("slides[#s1].image".to_string(), "/assets/x.png".to_string()),
            ("slides[#gone].image".to_string(), "/assets/y.png".to_string()),
        ]);
        assert_eq!(
            merged_fields(&store, &assigned),
            json!({ "slides": [{ "id": "s1", "image": "/assets/x.png" }] })
        );
    }
}
