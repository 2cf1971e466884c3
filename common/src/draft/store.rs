//! In-memory field values of one draft.
//!
//! The store owns a JSON object and mutates it through [`FieldPath`]s. List
//! items are JSON objects carrying an `id` string; the store guarantees those
//! ids are unique within their list and never hands out an id that was
//! removed earlier in the session. Every way in (construction, `replace`,
//! `set`, `append_item`) runs incoming items through the same id check.
//!
//! Mutations are all-or-nothing: a path that cannot be applied leaves the
//! fields exactly as they were.

use std::collections::HashSet;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::PathError;
use super::path::{FieldPath, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the list.
    Up,
    /// Towards the end of the list.
    Down,
}

#[derive(Debug, Clone)]
pub struct FieldStore {
    root: Value,
    retired: HashSet<String>,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl FieldStore {
    pub fn new(fields: Value) -> Self {
        let mut store = Self {
            root: Value::Object(Map::new()),
            retired: HashSet::new(),
        };
        store.load(fields);
        store
    }

    /// The whole `fields` object.
    pub fn fields(&self) -> &Value {
        &self.root
    }

    /// Replaces every field, keeping the record of retired ids.
    pub fn replace(&mut self, fields: Value) {
        self.load(fields);
    }

    fn load(&mut self, fields: Value) {
        let mut root = match fields {
            Value::Object(_) => fields,
            other => {
                log::warn!("draft fields must be an object, got {other}; starting empty");
                Value::Object(Map::new())
            }
        };
        self.seed_nested_ids(&mut root);
        self.root = root;
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |value, segment| child(value, segment))
    }

    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Writes `value` at `path`, creating missing objects and lists on the
    /// way. An index equal to the list length appends.
    ///
    /// Lists inside `value` get ids like appended records. A whole item
    /// written into a list slot keeps its own id only if no sibling holds it
    /// and it was never retired; otherwise it takes over the id of the item it
    /// replaces, or a fresh one. Item ids themselves cannot be written.
    ///
    /// Returns `Ok(false)` and leaves the fields untouched when the path runs
    /// through a scalar, an out-of-range index or an unknown item id.
    pub fn set(&mut self, path: &FieldPath, mut value: Value) -> Result<bool, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.is_pattern() {
            return Err(PathError::Pattern(path.to_string()));
        }
        if writes_item_id(path) {
            return Err(PathError::ItemId(path.to_string()));
        }
        if !can_assign(Some(&self.root), path.segments()) {
            log::debug!("ignoring write to unreachable path {path}");
            return Ok(false);
        }

        self.seed_nested_ids(&mut value);
        if let (Some((siblings, current)), Value::Object(map)) = (self.slot_ids(path), &mut value) {
            let id = match map.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() && !siblings.contains(id) && !self.retired.contains(id) => {
                    id.to_string()
                }
                _ => current.unwrap_or_else(|| self.fresh_id(&siblings)),
            };
            map.insert("id".to_string(), Value::String(id));
        }
        assign(&mut self.root, path.segments(), value);
        Ok(true)
    }

    /// Appends `record` to the list at `list`, creating the list if needed.
    ///
    /// The record keeps its own `id` only when it is non-empty, unused in the
    /// list and not previously retired; otherwise a fresh one is assigned.
    /// Nested lists of objects inside the record get ids the same way.
    pub fn append_item(
        &mut self,
        list: &FieldPath,
        mut record: Map<String, Value>,
    ) -> Result<String, PathError> {
        match self.get(list) {
            Some(Value::Array(_)) => {}
            None | Some(Value::Null) => {
                if !self.set(list, Value::Array(Vec::new()))? {
                    return Err(PathError::NotAList(list.to_string()));
                }
            }
            Some(_) => return Err(PathError::NotAList(list.to_string())),
        }

        let taken = self.ids_in(list);
        let id = match record.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() && !taken.contains(id) && !self.retired.contains(id) => {
                id.to_string()
            }
            _ => self.fresh_id(&taken),
        };
        record.insert("id".to_string(), Value::String(id.clone()));
        for value in record.values_mut() {
            self.seed_nested_ids(value);
        }

        let items = self
            .list_mut(list)
            .ok_or_else(|| PathError::NotAList(list.to_string()))?;
        items.push(Value::Object(record));
        Ok(id)
    }

    /// Removes the item with `id` from the list. Returns the removed record,
    /// or `None` when there was nothing to remove.
    pub fn remove_item(&mut self, list: &FieldPath, id: &str) -> Result<Option<Value>, PathError> {
        let Some(items) = self.list_mut(list) else {
            return Ok(None);
        };
        let Some(index) = items.iter().position(|item| item_id(item) == Some(id)) else {
            return Ok(None);
        };
        let removed = items.remove(index);
        self.retired.insert(id.to_string());
        Ok(Some(removed))
    }

    /// Swaps the item with its neighbour. Returns `false` at a boundary or when
    /// the item is missing.
    pub fn move_item(
        &mut self,
        list: &FieldPath,
        id: &str,
        direction: Direction,
    ) -> Result<bool, PathError> {
        let Some(items) = self.list_mut(list) else {
            return Ok(false);
        };
        let Some(index) = items.iter().position(|item| item_id(item) == Some(id)) else {
            return Ok(false);
        };
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < items.len() => index + 1,
            _ => return Ok(false),
        };
        items.swap(index, target);
        Ok(true)
    }

    pub fn ids_in(&self, list: &FieldPath) -> HashSet<String> {
        match self.get(list) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(item_id)
                .map(str::to_string)
                .collect(),
            _ => HashSet::new(),
        }
    }

    /// Rewrites positional selectors into id selectors where the item has an
    /// id, so the path keeps pointing at the same record after reordering.
    /// Returns `None` if the path does not resolve.
    pub fn normalize(&self, path: &FieldPath) -> Option<FieldPath> {
        let mut value = &self.root;
        let mut normalized = Vec::with_capacity(path.segments().len());
        for segment in path.segments() {
            let next = child(value, segment)?;
            normalized.push(match segment {
                Segment::Index(index) => item_segment(next, *index),
                other => other.clone(),
            });
            value = next;
        }
        Some(FieldPath::from(normalized))
    }

    /// Resolves a schema pattern (`slides[*].image`) into the normalized paths
    /// that currently exist.
    pub fn expand(&self, pattern: &FieldPath) -> Vec<FieldPath> {
        let mut out = Vec::new();
        expand_into(&self.root, pattern.segments(), FieldPath::default(), &mut out);
        out
    }

    /// For a path ending on a list slot: the ids of the other items in that
    /// list, and the id of the item currently in the slot.
    fn slot_ids(&self, path: &FieldPath) -> Option<(HashSet<String>, Option<String>)> {
        let (last, parent) = path.segments().split_last()?;
        if !matches!(last, Segment::Index(_) | Segment::Id(_)) {
            return None;
        }
        let current = self.get(path).and_then(item_id).map(str::to_string);
        let mut siblings = self.ids_in(&FieldPath::from(parent.to_vec()));
        if let Some(current) = &current {
            siblings.remove(current);
        }
        Some((siblings, current))
    }

    fn list_mut(&mut self, list: &FieldPath) -> Option<&mut Vec<Value>> {
        let mut value = &mut self.root;
        for segment in list.segments() {
            value = child_mut(value, segment)?;
        }
        value.as_array_mut()
    }

    fn fresh_id(&self, taken: &HashSet<String>) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !taken.contains(&id) && !self.retired.contains(&id) {
                return id;
            }
        }
    }

    fn seed_nested_ids(&self, value: &mut Value) {
        match value {
            Value::Array(items) => {
                let mut taken: HashSet<String> = HashSet::new();
                for item in items.iter_mut() {
                    let Value::Object(map) = item else { continue };
                    let keep = map
                        .get("id")
                        .and_then(Value::as_str)
                        .filter(|id| !id.is_empty() && !taken.contains(*id) && !self.retired.contains(*id))
                        .map(str::to_string);
                    let id = keep.unwrap_or_else(|| self.fresh_id(&taken));
                    map.insert("id".to_string(), Value::String(id.clone()));
                    taken.insert(id);
                    for nested in map.values_mut() {
                        self.seed_nested_ids(nested);
                    }
                }
            }
            Value::Object(map) => {
                for nested in map.values_mut() {
                    self.seed_nested_ids(nested);
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn item_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str).filter(|id| !id.is_empty())
}

/// `list[…].id`: the id key of a list item.
fn writes_item_id(path: &FieldPath) -> bool {
    match path.segments() {
        [.., Segment::Index(_) | Segment::Id(_), Segment::Key(key)] => key == "id",
        _ => false,
    }
}

fn item_segment(item: &Value, index: usize) -> Segment {
    match item_id(item) {
        Some(id) => Segment::Id(id.to_string()),
        None => Segment::Index(index),
    }
}

fn child<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (segment, value) {
        (Segment::Key(key), Value::Object(map)) => map.get(key),
        (Segment::Index(index), Value::Array(items)) => items.get(*index),
        (Segment::Id(id), Value::Array(items)) => {
            items.iter().find(|item| item_id(item) == Some(id.as_str()))
        }
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (segment, value) {
        (Segment::Key(key), Value::Object(map)) => map.get_mut(key),
        (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
        (Segment::Id(id), Value::Array(items)) => items
            .iter_mut()
            .find(|item| item_id(item) == Some(id.as_str())),
        _ => None,
    }
}

/// Dry run of [`assign`]: can `segments` be written below `slot` without
/// hitting a scalar, a gap in a list or an unknown id?
fn can_assign(slot: Option<&Value>, segments: &[Segment]) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return true;
    };
    match slot {
        // Missing containers are created: objects for keys, lists for `[0]`.
        None | Some(Value::Null) => match segment {
            Segment::Key(_) | Segment::Index(0) => can_assign(None, rest),
            _ => false,
        },
        Some(Value::Object(map)) => match segment {
            Segment::Key(key) => can_assign(map.get(key), rest),
            _ => false,
        },
        Some(Value::Array(items)) => match segment {
            Segment::Index(index) if *index < items.len() => can_assign(items.get(*index), rest),
            Segment::Index(index) if *index == items.len() => can_assign(None, rest),
            Segment::Id(id) => items
                .iter()
                .find(|item| item_id(item) == Some(id.as_str()))
                .is_some_and(|item| can_assign(Some(item), rest)),
            _ => false,
        },
        Some(_) => false,
    }
}

fn assign(slot: &mut Value, segments: &[Segment], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };
    if slot.is_null() {
        *slot = match segment {
            Segment::Key(_) => Value::Object(Map::new()),
            _ => Value::Array(Vec::new()),
        };
    }
    let next = match (segment, slot) {
        (Segment::Key(key), Value::Object(map)) => map.entry(key.clone()).or_insert(Value::Null),
        (Segment::Index(index), Value::Array(items)) => {
            if *index == items.len() {
                items.push(Value::Null);
            }
            match items.get_mut(*index) {
                Some(next) => next,
                None => return,
            }
        }
        (Segment::Id(id), Value::Array(items)) => {
            match items.iter_mut().find(|item| item_id(item) == Some(id.as_str())) {
                Some(next) => next,
                None => return,
            }
        }
        _ => return,
    };
    assign(next, rest, value);
}

fn expand_into(value: &Value, segments: &[Segment], prefix: FieldPath, out: &mut Vec<FieldPath>) {
    let Some((segment, rest)) = segments.split_first() else {
        out.push(prefix);
        return;
    };
    match segment {
        Segment::Wildcard => {
            if let Value::Array(items) = value {
                for (index, item) in items.iter().enumerate() {
                    expand_into(item, rest, prefix.join(item_segment(item, index)), out);
                }
            }
        }
        other => {
            if let Some(next) = child(value, other) {
                let normalized = match other {
                    Segment::Index(index) => item_segment(next, *index),
                    _ => other.clone(),
                };
                expand_into(next, rest, prefix.join(normalized), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut store = FieldStore::default();
        assert!(store.set(&path("size.width"), json!("100%")).unwrap());
        assert_eq!(store.fields(), &json!({ "size": { "width": "100%" } }));
    }

    #[test]
    fn set_appends_at_list_length_and_ignores_gaps() {
        let mut store = FieldStore::new(json!({ "tags": ["a"] }));
        assert!(store.set(&path("tags[1]"), json!("b")).unwrap());
        assert!(!store.set(&path("tags[5]"), json!("z")).unwrap());
        assert_eq!(store.fields(), &json!({ "tags": ["a", "b"] }));
    }

    #[test]
    fn set_through_a_scalar_changes_nothing() {
        let mut store = FieldStore::new(json!({ "title": "Sale" }));
        let before = store.fields().clone();
        assert!(!store.set(&path("title.text"), json!("x")).unwrap());
        assert!(!store.set(&path("missing[#nope].label"), json!("x")).unwrap());
        assert_eq!(store.fields(), &before);
    }

    #[test]
    fn set_rejects_patterns() {
        let mut store = FieldStore::new(json!({}));
        assert!(matches!(
            store.set(&path("slides[*].image"), json!("")),
            Err(PathError::Pattern(_))
        ));
    }

    #[test]
    fn nested_paths_by_position_and_by_id() {
        let mut store = FieldStore::new(json!({
            "columns": [
                { "id": "c1", "title": "Shop", "links": [{ "id": "l1", "label": "Old" }] }
            ]
        }));
        assert!(store.set(&path("columns[0].links[0].label"), json!("New")).unwrap());
        assert_eq!(store.get_str(&path("columns[#c1].links[#l1].label")), Some("New"));
    }

    #[test]
    fn append_assigns_unique_ids_and_creates_the_list() {
        let mut store = FieldStore::new(json!({}));
        let a = store.append_item(&path("slides"), record(json!({ "title": "A" }))).unwrap();
        let b = store
            .append_item(&path("slides"), record(json!({ "id": a.clone(), "title": "B" })))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(store.ids_in(&path("slides")).len(), 2);
    }

    #[test]
    fn append_keeps_a_fresh_caller_supplied_id() {
        let mut store = FieldStore::new(json!({}));
        let id = store
            .append_item(&path("members"), record(json!({ "id": "m1", "name": "Asha" })))
            .unwrap();
        assert_eq!(id, "m1");
    }

    #[test]
    fn append_seeds_ids_of_nested_lists() {
        let mut store = FieldStore::new(json!({}));
        let id = store
            .append_item(
                &path("columns"),
                record(json!({ "title": "Links", "links": [{ "label": "a" }, { "label": "b" }] })),
            )
            .unwrap();
        let links = store.ids_in(&path(&format!("columns[#{id}].links")));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn append_to_a_scalar_is_an_error() {
        let mut store = FieldStore::new(json!({ "title": "x" }));
        assert!(matches!(
            store.append_item(&path("title"), Map::new()),
            Err(PathError::NotAList(_))
        ));
    }

    #[test]
    fn removed_ids_are_never_handed_out_again() {
        let mut store = FieldStore::new(json!({}));
        let list = path("members");
        let first = store.append_item(&list, record(json!({ "name": "A" }))).unwrap();
        assert!(store.remove_item(&list, &first).unwrap().is_some());

        let again = store
            .append_item(&list, record(json!({ "id": first.clone(), "name": "B" })))
            .unwrap();
        assert_ne!(again, first);
    }

    #[test]
    fn remove_missing_item_is_a_no_op() {
        let mut store = FieldStore::new(json!({ "members": [] }));
        assert_eq!(store.remove_item(&path("members"), "ghost").unwrap(), None);
        assert_eq!(store.remove_item(&path("nothing"), "ghost").unwrap(), None);
    }

    #[test]
    fn move_item_swaps_neighbours_and_stops_at_bounds() {
        let mut store = FieldStore::new(json!({ "s": [{ "id": "a" }, { "id": "b" }, { "id": "c" }] }));
        let list = path("s");
        assert!(store.move_item(&list, "c", Direction::Up).unwrap());
        assert!(!store.move_item(&list, "a", Direction::Up).unwrap());
        assert!(!store.move_item(&list, "b", Direction::Down).unwrap());
        assert!(!store.move_item(&list, "zz", Direction::Down).unwrap());
        assert_eq!(store.fields(), &json!({ "s": [{ "id": "a" }, { "id": "c" }, { "id": "b" }] }));
    }

    #[test]
    fn normalize_prefers_ids_over_positions() {
        let store = FieldStore::new(json!({ "slides": [{ "id": "s1", "image": "" }, { "image": "" }] }));
        assert_eq!(
            store.normalize(&path("slides[0].image")).unwrap().to_string(),
            "slides[#s1].image"
        );
        let second = store.get_str(&path("slides[1].id")).unwrap().to_string();
        assert_eq!(
            store.normalize(&path("slides[1].image")).unwrap().to_string(),
            format!("slides[#{second}].image")
        );
        assert!(store.normalize(&path("slides[2].image")).is_none());
    }

    fn unique_ids(store: &FieldStore, list: &str) -> bool {
        let items = store.get(&path(list)).and_then(Value::as_array).unwrap();
        items.iter().all(|item| item_id(item).is_some()) && store.ids_in(&path(list)).len() == items.len()
    }

    #[test]
    fn loaded_fields_get_unique_item_ids() {
        let mut store = FieldStore::new(json!({
            "members": [{ "id": "m1" }, { "id": "m1" }, { "name": "no id" }],
            "columns": [{ "id": "c1", "links": [{ "label": "a" }, { "label": "b" }] }]
        }));
        assert!(unique_ids(&store, "members"));
        assert!(unique_ids(&store, "columns[#c1].links"));
        assert_eq!(store.get_str(&path("members[0].id")), Some("m1"));

        assert!(store.remove_item(&path("members"), "m1").unwrap().is_some());
        store.replace(json!({ "members": [{ "id": "m1", "name": "back" }] }));
        assert_ne!(store.get_str(&path("members[0].id")), Some("m1"));
        assert!(unique_ids(&store, "members"));
    }

    #[test]
    fn set_of_a_whole_item_keeps_ids_unique() {
        let mut store = FieldStore::new(json!({}));
        let list = path("members");
        let a = store.append_item(&list, record(json!({ "name": "A" }))).unwrap();
        let b = store.append_item(&list, record(json!({ "name": "B" }))).unwrap();

        assert!(store.set(&path("members[1]"), json!({ "id": a.clone(), "name": "dup" })).unwrap());
        assert_eq!(store.get_str(&path("members[1].id")), Some(b.as_str()));
        assert!(store.set(&path("members[2]"), json!({ "name": "no id" })).unwrap());
        assert!(unique_ids(&store, "members"));

        assert!(store.remove_item(&list, &a).unwrap().is_some());
        assert_eq!(store.ids_in(&list).len(), 2);
        assert!(!store.ids_in(&list).contains(&a));
    }

    #[test]
    fn set_never_brings_back_a_retired_id() {
        let mut store = FieldStore::new(json!({}));
        let list = path("members");
        let gone = store.append_item(&list, record(json!({ "name": "A" }))).unwrap();
        store.remove_item(&list, &gone).unwrap();

        assert!(store.set(&path("members[0]"), json!({ "id": gone.clone(), "name": "A" })).unwrap());
        assert!(store.set(&list, json!([{ "id": gone.clone() }, { "name": "B" }])).unwrap());
        assert!(!store.ids_in(&list).contains(&gone));
        assert!(unique_ids(&store, "members"));
    }

    #[test]
    fn item_ids_cannot_be_written() {
        let mut store = FieldStore::new(json!({ "members": [{ "id": "m1" }, { "id": "m2" }] }));
        assert!(matches!(
            store.set(&path("members[1].id"), json!("m1")),
            Err(PathError::ItemId(_))
        ));
        assert!(store.set(&path("meta.id"), json!("plain key")).unwrap());
    }

    #[test]
    fn expand_resolves_wildcards_to_existing_paths() {
        let store = FieldStore::new(json!({
            "components": [
                { "id": "logo", "config": { "src": "data:x" } },
                { "id": "menu", "config": { "links": [] } }
            ]
        }));
        let found: Vec<String> = store
            .expand(&path("components[*].config.src"))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, ["components[#logo].config.src"]);
    }

    #[test]
    fn non_object_fields_start_empty() {
        let store = FieldStore::new(json!([1, 2]));
        assert_eq!(store.fields(), &json!({}));
    }
}
