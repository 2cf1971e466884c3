//! Configuration draft manager.
//!
//! A draft is one editable section configuration. It moves between four
//! states: empty, edited but unsaved, saved remotely, and published. The
//! pieces, leaves first:
//!
//! - [`store::FieldStore`]: the in-memory field values, addressed by [`path::FieldPath`].
//! - [`mirror::LocalMirror`]: best-effort copy of the draft in a key-value store
//!   so a reload restores it. Never the answer to "is this saved".
//! - [`snapshot::Snapshot`]: canonical digest of the saveable fields, used for
//!   dirty tracking and to skip redundant saves.
//! - [`sync::RemoteSynchronizer`]: builds the save payload and talks to a
//!   [`sync::RemoteBackend`].
//! - [`publish::PublishGate`]: hands saved, unmodified drafts to a [`publish::Renderer`].
//! - [`manager::DraftManager`]: ties them together and owns the state machine.

pub mod asset;
pub mod error;
pub mod manager;
pub mod mirror;
pub mod path;
pub mod publish;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use error::{DraftError, PathError, StorageError, SyncError};
pub use manager::{DraftManager, DraftState, PendingDelete, PendingSave, ResetOutcome, SaveOutcome, SaveStart};
pub use mirror::{KeyValueStore, LocalMirror, MemoryStore};
pub use path::FieldPath;
pub use snapshot::Snapshot;
pub use store::{Direction, FieldStore};
