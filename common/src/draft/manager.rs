//! The configuration draft state machine.
//!
//! ```text
//! Empty --edit--> Editing(dirty) --save ok--> Editing(clean) --publish--> Published
//!                      ^                            |                        |
//!                      +-----------edit-------------+------------------------+
//! any state --reset--> Empty
//! ```
//!
//! Saving is split in two so an event loop can run the network call without
//! holding the manager: [`DraftManager::begin_save`] validates, short-circuits
//! unchanged drafts and marks the save in flight; [`DraftManager::complete_save`]
//! applies the backend's answer unless the draft was reset or renamed in the
//! meantime. [`DraftManager::save`] runs both around a [`RemoteBackend`] call.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::error::{DraftError, SyncError};
use super::mirror::{LocalMirror, MirrorEntry};
use super::path::{FieldPath, Segment};
use super::publish::{PublishGate, Renderer, merged_fields};
use super::snapshot::Snapshot;
use super::store::{Direction, FieldStore};
use super::sync::{RemoteBackend, RemoteSynchronizer, value_digest};
use crate::model::schema::SectionSchema;
use crate::model::section::SectionKind;
use crate::requests::{SaveSectionRequest, SaveSectionResponse, SectionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// Fresh or reset: defaults only, nothing saved.
    Empty,
    Editing { dirty: bool },
    /// Handed to the renderer and unchanged since.
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { record_id: String },
    /// Nothing changed since the last successful save; no request was sent.
    AlreadySaved { record_id: String },
}

impl SaveOutcome {
    pub fn record_id(&self) -> &str {
        match self {
            SaveOutcome::Saved { record_id } | SaveOutcome::AlreadySaved { record_id } => record_id,
        }
    }
}

/// A save that has been validated and is waiting for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    generation: u64,
    identifier: String,
    snapshot: Snapshot,
    pub request: SaveSectionRequest,
    /// Record to update; `None` creates a new one.
    pub record_id: Option<String>,
    uploads: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStart {
    Unchanged(SaveOutcome),
    Pending(PendingSave),
}

/// Remote cleanup left to do after a local reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: SectionKind,
    pub record_id: String,
}

/// Result of [`DraftManager::reset`]. The local draft is always reset; only
/// the remote cleanup can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub remote: Result<(), SyncError>,
}

pub struct DraftManager {
    kind: SectionKind,
    identifier: String,
    store: FieldStore,
    server_assigned: BTreeMap<String, String>,
    record_id: Option<String>,
    saved: Option<Snapshot>,
    touched: bool,
    published: bool,
    in_flight: bool,
    generation: u64,
    mirror: LocalMirror,
    sync: RemoteSynchronizer,
}

impl DraftManager {
    /// A new, unnamed draft holding the section's defaults.
    pub fn new(kind: SectionKind, mirror: LocalMirror, sync: RemoteSynchronizer) -> Self {
        Self {
            kind,
            identifier: String::new(),
            store: FieldStore::new((kind.schema().defaults)()),
            server_assigned: BTreeMap::new(),
            record_id: None,
            saved: None,
            touched: false,
            published: false,
            in_flight: false,
            generation: 0,
            mirror,
            sync,
        }
    }

    /// Opens the draft `identifier`, restoring it from the local mirror when
    /// a copy exists.
    pub fn open(
        kind: SectionKind,
        identifier: &str,
        mirror: LocalMirror,
        sync: RemoteSynchronizer,
    ) -> Self {
        let mut manager = Self::new(kind, mirror, sync);
        manager.identifier = identifier.trim().to_string();
        manager.hydrate_from_mirror();
        manager.mirror.remember_identifier(kind, &manager.identifier);
        manager
    }

    /// Reopens the draft edited last for `kind`, or starts a new one.
    pub fn restore_last(kind: SectionKind, mirror: LocalMirror, sync: RemoteSynchronizer) -> Self {
        match mirror.last_identifier(kind) {
            Some(identifier) => Self::open(kind, &identifier, mirror, sync),
            None => Self::new(kind, mirror, sync),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn schema(&self) -> &'static SectionSchema {
        self.kind.schema()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn fields(&self) -> &Value {
        self.store.fields()
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        self.store.get(path)
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn server_assigned(&self) -> &BTreeMap<String, String> {
        &self.server_assigned
    }

    pub fn saved_snapshot(&self) -> Option<&Snapshot> {
        self.saved.as_ref()
    }

    pub fn synchronizer(&self) -> &RemoteSynchronizer {
        &self.sync
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.identifier, self.kind, self.store.fields())
    }

    pub fn is_dirty(&self) -> bool {
        if !self.touched && self.saved.is_none() {
            return false;
        }
        self.saved.as_ref() != Some(&self.snapshot())
    }

    pub fn state(&self) -> DraftState {
        if !self.touched && self.saved.is_none() {
            return DraftState::Empty;
        }
        let dirty = self.is_dirty();
        if self.published && !dirty {
            DraftState::Published
        } else {
            DraftState::Editing { dirty }
        }
    }

    pub fn can_publish(&self) -> bool {
        PublishGate::can_publish(self.saved.as_ref(), &self.snapshot())
    }

    /// Fields with server-assigned values (stored asset URLs) applied. This is
    /// what the renderer receives.
    pub fn published_fields(&self) -> Value {
        merged_fields(&self.store, &self.server_assigned)
    }

    /// Writes a single field. Returns `false` when the path cannot be reached
    /// (the draft is left as it was).
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<bool, DraftError> {
        if !self.store.set(path, value)? {
            return Ok(false);
        }
        if let Some(normalized) = self.store.normalize(path) {
            self.forget_server_values(&normalized);
        }
        self.after_edit();
        Ok(true)
    }

    pub fn set_str(&mut self, path: &str, value: Value) -> Result<bool, DraftError> {
        self.set(&FieldPath::parse(path)?, value)
    }

    pub fn append_item(
        &mut self,
        list: &FieldPath,
        record: Map<String, Value>,
    ) -> Result<String, DraftError> {
        let id = self.store.append_item(list, record)?;
        self.after_edit();
        Ok(id)
    }

    pub fn remove_item(&mut self, list: &FieldPath, id: &str) -> Result<bool, DraftError> {
        let item = self.store.normalize(list).map(|list| list.join(Segment::Id(id.to_string())));
        if self.store.remove_item(list, id)?.is_none() {
            return Ok(false);
        }
        if let Some(item) = item {
            self.forget_server_values(&item);
        }
        self.after_edit();
        Ok(true)
    }

    pub fn move_item(
        &mut self,
        list: &FieldPath,
        id: &str,
        direction: Direction,
    ) -> Result<bool, DraftError> {
        let moved = self.store.move_item(list, id, direction)?;
        if moved {
            self.after_edit();
        }
        Ok(moved)
    }

    /// Changes the identifier, moving the mirrored copy along. Refused while a
    /// save is in flight: its response belongs to the current identifier.
    pub fn rename(&mut self, identifier: &str) -> Result<(), DraftError> {
        let identifier = identifier.trim();
        if identifier == self.identifier {
            return Ok(());
        }
        if self.in_flight {
            return Err(DraftError::SaveInProgress);
        }
        self.mirror.clear(self.kind, &self.identifier);
        log::debug!("renaming {} draft `{}` to `{identifier}`", self.kind, self.identifier);
        self.identifier = identifier.to_string();
        self.generation += 1;
        self.mirror.remember_identifier(self.kind, &self.identifier);
        self.after_edit();
        Ok(())
    }

    /// Validates the draft and prepares the request. Unchanged drafts are
    /// reported as already saved without a request.
    pub fn begin_save(&mut self) -> Result<SaveStart, DraftError> {
        if self.in_flight {
            return Err(DraftError::SaveInProgress);
        }
        let snapshot = self.snapshot();
        if let (Some(saved), Some(record_id)) = (&self.saved, &self.record_id) {
            if *saved == snapshot {
                log::debug!("{} `{}` unchanged since last save", self.kind, self.identifier);
                return Ok(SaveStart::Unchanged(SaveOutcome::AlreadySaved {
                    record_id: record_id.clone(),
                }));
            }
        }

        let prepared =
            self.sync
                .prepare(self.schema(), &self.identifier, &self.store, &self.server_assigned)?;
        self.in_flight = true;
        Ok(SaveStart::Pending(PendingSave {
            generation: self.generation,
            identifier: self.identifier.clone(),
            snapshot,
            request: prepared.request,
            record_id: self.record_id.clone(),
            uploads: prepared.uploads,
        }))
    }

    /// Applies the backend's answer to a save started with
    /// [`begin_save`](Self::begin_save). Failures leave the draft as it was.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: Result<SaveSectionResponse, SyncError>,
    ) -> Result<SaveOutcome, DraftError> {
        if pending.generation != self.generation || pending.identifier != self.identifier {
            log::warn!(
                "discarding save response for {} `{}`: draft was reset or renamed",
                self.kind,
                pending.identifier
            );
            return Err(DraftError::StaleResponse);
        }
        self.in_flight = false;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log::warn!("saving {} `{}` failed: {err}", self.kind, self.identifier);
                return Err(err.into());
            }
        };

        for (path, digest) in &pending.uploads {
            let Some(url) = response.asset_urls.get(path) else {
                log::warn!("backend returned no URL for uploaded asset {path}");
                continue;
            };
            let unchanged = FieldPath::parse(path)
                .ok()
                .and_then(|path| self.store.get_str(&path).map(value_digest))
                .is_some_and(|current| current == *digest);
            if unchanged {
                self.server_assigned.insert(path.clone(), url.clone());
            }
        }

        self.record_id = Some(response.record_id.clone());
        self.saved = Some(pending.snapshot);
        self.touched = true;
        self.persist();
        log::info!("saved {} `{}` as record {}", self.kind, self.identifier, response.record_id);
        Ok(SaveOutcome::Saved {
            record_id: response.record_id,
        })
    }

    pub async fn save<B: RemoteBackend>(&mut self, backend: &B) -> Result<SaveOutcome, DraftError> {
        let pending = match self.begin_save()? {
            SaveStart::Unchanged(outcome) => return Ok(outcome),
            SaveStart::Pending(pending) => pending,
        };
        let result = self
            .sync
            .send(backend, pending.record_id.as_deref(), &pending.request)
            .await;
        self.complete_save(pending, result)
    }

    /// Resets the draft locally right away and returns the remote record, if
    /// any, that still has to be deleted.
    pub fn begin_reset(&mut self) -> Option<PendingDelete> {
        self.mirror.clear(self.kind, &self.identifier);
        self.store.replace((self.schema().defaults)());
        self.server_assigned.clear();
        self.saved = None;
        self.touched = false;
        self.published = false;
        self.in_flight = false;
        self.generation += 1;
        log::info!("reset {} `{}`", self.kind, self.identifier);
        self.record_id.take().map(|record_id| PendingDelete {
            kind: self.kind,
            record_id,
        })
    }

    pub async fn reset<B: RemoteBackend>(&mut self, backend: &B) -> ResetOutcome {
        let remote = match self.begin_reset() {
            Some(pending) => {
                let result = self.sync.delete(backend, pending.kind, &pending.record_id).await;
                if let Err(err) = &result {
                    log::warn!("could not delete {} record {}: {err}", pending.kind, pending.record_id);
                }
                result
            }
            None => Ok(()),
        };
        ResetOutcome { remote }
    }

    /// Hands the draft to `renderer` if it is saved and unchanged.
    pub fn publish<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<(), DraftError> {
        PublishGate::publish(
            renderer,
            self.kind,
            &self.identifier,
            self.saved.as_ref(),
            &self.snapshot(),
            self.published_fields(),
        )?;
        self.published = true;
        self.persist();
        Ok(())
    }

    /// Replaces the draft with a record fetched from the backend. The result
    /// is clean: the record is by definition what was last saved.
    pub fn hydrate_from_record(&mut self, record: SectionRecord) {
        if record.kind != self.kind {
            log::warn!("ignoring {} record for a {} draft", record.kind, self.kind);
            return;
        }
        if record.identifier != self.identifier {
            self.mirror.clear(self.kind, &self.identifier);
        }
        self.identifier = record.identifier;
        self.store.replace(record.fields);
        self.server_assigned.clear();
        self.record_id = Some(record.record_id);
        self.saved = Some(self.snapshot());
        self.touched = true;
        self.published = false;
        self.in_flight = false;
        self.generation += 1;
        self.mirror.remember_identifier(self.kind, &self.identifier);
        self.persist();
    }

    fn hydrate_from_mirror(&mut self) {
        let Some(entry) = self.mirror.read(self.kind, &self.identifier) else {
            return;
        };
        self.store.replace(entry.fields);
        self.server_assigned = entry.server_assigned;
        self.record_id = entry.record_id;
        self.saved = entry.saved_snapshot;
        self.touched = true;
        self.published = entry.published && !self.is_dirty();
        log::debug!(
            "restored {} `{}` from local mirror (dirty: {})",
            self.kind,
            self.identifier,
            self.is_dirty()
        );
    }

    fn after_edit(&mut self) {
        self.touched = true;
        self.published = false;
        self.persist();
    }

    fn forget_server_values(&mut self, edited: &FieldPath) {
        self.server_assigned.retain(|path, _| {
            FieldPath::parse(path).is_ok_and(|path| !path.starts_with(edited))
        });
    }

    fn persist(&self) {
        self.mirror.write(&MirrorEntry {
            identifier: self.identifier.clone(),
            kind: self.kind,
            fields: self.store.fields().clone(),
            server_assigned: self.server_assigned.clone(),
            record_id: self.record_id.clone(),
            saved_snapshot: self.saved.clone(),
            published: self.published,
        });
    }
}
