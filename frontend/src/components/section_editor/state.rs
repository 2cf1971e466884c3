//! Component state of the section editor.
//!
//! The draft itself (fields, record id, saved snapshot, published flag) lives
//! in the [`DraftManager`]. Everything here is UI-only and is never mirrored
//! or saved.

use common::draft::sync::RemoteSynchronizer;
use common::draft::DraftManager;
use common::model::section::SectionKind;

use crate::storage::browser_mirror;
use crate::transport::HttpBackend;

pub struct SectionEditor {
    /// The draft of the section kind this editor was mounted for.
    pub manager: DraftManager,

    pub backend: HttpBackend,

    /// Text of the identifier input. Applied to the draft (a rename) when the
    /// input is committed or right before a save.
    pub identifier_input: String,

    /// Active tab: either `"editor"` or `"preview"`.
    pub active_tab: String,

    /// A remote delete started by a reset is still running.
    pub resetting: bool,

    /// A fetch of the saved record is still running.
    pub loading_remote: bool,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl SectionEditor {
    /// Restores the last draft edited for `kind` from local storage, or
    /// starts from the section defaults.
    pub fn new(kind: SectionKind) -> Self {
        let manager = DraftManager::restore_last(kind, browser_mirror(), RemoteSynchronizer::default());
        Self {
            identifier_input: manager.identifier().to_string(),
            manager,
            backend: HttpBackend,
            active_tab: "editor".to_string(),
            resetting: false,
            loading_remote: false,
            loaded: false,
        }
    }
}
