//! Best-effort local copy of drafts.
//!
//! The mirror writes every mutation of a draft into a [`KeyValueStore`] (the
//! browser's `localStorage` in the editor, [`MemoryStore`] in tests) so a page
//! reload can restore unsaved work. It is a cache: failures are logged and
//! swallowed, malformed entries read as missing, and after the first storage
//! failure the mirror keeps working in memory for the rest of the session.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::StorageError;
use super::snapshot::Snapshot;
use crate::model::section::SectionKind;

/// Durable string slots. Implementations report failures; the mirror decides
/// what to do with them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same slots, which lets tests drop a
/// draft manager and build a fresh one over the "same" storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Namespace for every key the mirror writes.
    pub prefix: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            prefix: "section-builder".to_string(),
        }
    }
}

/// What the mirror keeps for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorEntry {
    pub identifier: String,
    pub kind: SectionKind,
    pub fields: Value,
    #[serde(default)]
    pub server_assigned: BTreeMap<String, String>,
    #[serde(default)]
    pub record_id: Option<String>,
    /// Snapshot of the last successful remote save, if any.
    #[serde(default)]
    pub saved_snapshot: Option<Snapshot>,
    #[serde(default)]
    pub published: bool,
}

pub struct LocalMirror {
    store: Rc<dyn KeyValueStore>,
    fallback: MemoryStore,
    degraded: Cell<bool>,
    prefix: String,
}

impl LocalMirror {
    pub fn new(store: Rc<dyn KeyValueStore>, config: MirrorConfig) -> Self {
        Self {
            store,
            fallback: MemoryStore::new(),
            degraded: Cell::new(false),
            prefix: config.prefix,
        }
    }

    /// A mirror that never touches durable storage.
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStore::new()), MirrorConfig::default())
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    pub fn write(&self, entry: &MirrorEntry) {
        let key = self.entry_key(entry.kind, &entry.identifier);
        match serde_json::to_string(entry) {
            Ok(json) => self.put(&key, &json),
            Err(err) => log::warn!("could not serialize draft `{key}`: {err}"),
        }
    }

    pub fn read(&self, kind: SectionKind, identifier: &str) -> Option<MirrorEntry> {
        let key = self.entry_key(kind, identifier);
        let raw = self.fetch(&key)?;
        match serde_json::from_str::<MirrorEntry>(&raw) {
            Ok(entry) if entry.kind == kind && entry.identifier == identifier => Some(entry),
            Ok(_) => {
                log::warn!("ignoring mirrored draft `{key}` stored for another section");
                None
            }
            Err(err) => {
                log::warn!("ignoring malformed mirrored draft `{key}`: {err}");
                None
            }
        }
    }

    pub fn clear(&self, kind: SectionKind, identifier: &str) {
        let key = self.entry_key(kind, identifier);
        self.delete(&key);
    }

    /// Identifier of the draft last edited for `kind`, used to reopen it on
    /// startup.
    pub fn last_identifier(&self, kind: SectionKind) -> Option<String> {
        self.fetch(&self.pointer_key(kind)).filter(|id| !id.is_empty())
    }

    pub fn remember_identifier(&self, kind: SectionKind, identifier: &str) {
        let key = self.pointer_key(kind);
        if identifier.is_empty() {
            self.delete(&key);
        } else {
            self.put(&key, identifier);
        }
    }

    fn entry_key(&self, kind: SectionKind, identifier: &str) -> String {
        format!("{}:{}:{}", self.prefix, kind, identifier)
    }

    /// Kept out of the `{prefix}:{kind}:` namespace so no identifier can
    /// collide with it.
    fn pointer_key(&self, kind: SectionKind) -> String {
        format!("{}:@last:{}", self.prefix, kind)
    }

    fn fetch(&self, key: &str) -> Option<String> {
        if !self.degraded.get() {
            match self.store.get(key) {
                Ok(value) => return value,
                Err(err) => self.degrade(&err),
            }
        }
        self.fallback.get(key).ok().flatten()
    }

    fn put(&self, key: &str, value: &str) {
        if !self.degraded.get() {
            match self.store.set(key, value) {
                Ok(()) => return,
                Err(err) => self.degrade(&err),
            }
        }
        let _ = self.fallback.set(key, value);
    }

    fn delete(&self, key: &str) {
        if !self.degraded.get() {
            match self.store.remove(key) {
                Ok(()) => return,
                Err(err) => self.degrade(&err),
            }
        }
        let _ = self.fallback.remove(key);
    }

    fn degrade(&self, err: &StorageError) {
        log::warn!("{err}; keeping drafts in memory for this session");
        self.degraded.set(true);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::LocalStorageUnavailable("disabled".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::LocalStorageUnavailable("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::LocalStorageUnavailable("disabled".into()))
        }
    }

    fn entry(identifier: &str) -> MirrorEntry {
        MirrorEntry {
            identifier: identifier.to_string(),
            kind: SectionKind::Footer,
            fields: json!({ "copyrightText": "© Acme" }),
            server_assigned: BTreeMap::new(),
            record_id: None,
            saved_snapshot: None,
            published: false,
        }
    }

    #[test]
    fn write_then_read_uses_prefixed_keys() {
        let store = MemoryStore::new();
        let mirror = LocalMirror::new(Rc::new(store.clone()), MirrorConfig { prefix: "t".into() });
        mirror.write(&entry("main-footer"));

        assert_eq!(store.keys(), ["t:footer:main-footer"]);
        assert_eq!(mirror.read(SectionKind::Footer, "main-footer"), Some(entry("main-footer")));
        assert_eq!(mirror.read(SectionKind::Navbar, "main-footer"), None);
    }

    #[test]
    fn malformed_entries_read_as_missing() {
        let store = MemoryStore::new();
        store.set("section-builder:footer:x", "{not json").unwrap();
        let mirror = LocalMirror::new(Rc::new(store), MirrorConfig::default());
        assert_eq!(mirror.read(SectionKind::Footer, "x"), None);
    }

    #[test]
    fn clear_removes_the_entry() {
        let mirror = LocalMirror::in_memory();
        mirror.write(&entry("a"));
        mirror.clear(SectionKind::Footer, "a");
        assert_eq!(mirror.read(SectionKind::Footer, "a"), None);
    }

    #[test]
    fn storage_failures_degrade_to_memory() {
        let mirror = LocalMirror::new(Rc::new(BrokenStore), MirrorConfig::default());
        mirror.write(&entry("a"));
        assert!(mirror.is_degraded());
        assert_eq!(mirror.read(SectionKind::Footer, "a"), Some(entry("a")));
        mirror.clear(SectionKind::Footer, "a");
        assert_eq!(mirror.read(SectionKind::Footer, "a"), None);
    }

    #[test]
    fn last_identifier_pointer() {
        let mirror = LocalMirror::in_memory();
        assert_eq!(mirror.last_identifier(SectionKind::Navbar), None);
        mirror.remember_identifier(SectionKind::Navbar, "site-1");
        assert_eq!(mirror.last_identifier(SectionKind::Navbar).as_deref(), Some("site-1"));
        mirror.remember_identifier(SectionKind::Navbar, "");
        assert_eq!(mirror.last_identifier(SectionKind::Navbar), None);
    }

    #[test]
    fn pointer_and_entries_never_share_a_key() {
        let store = MemoryStore::new();
        let mirror = LocalMirror::new(Rc::new(store.clone()), MirrorConfig { prefix: "t".into() });
        mirror.write(&entry("@last"));
        mirror.remember_identifier(SectionKind::Footer, "@last");

        assert_eq!(store.keys(), ["t:@last:footer", "t:footer:@last"]);
        assert_eq!(mirror.read(SectionKind::Footer, "@last"), Some(entry("@last")));
        assert_eq!(mirror.last_identifier(SectionKind::Footer).as_deref(), Some("@last"));
    }
}
