use common::draft::{Direction, PendingSave, SyncError};
use common::requests::{SaveSectionResponse, SectionRecord};
use serde_json::{Map, Value};

#[derive(Clone)]
pub enum Msg {
    SetTab(String),
    SetField(String, Value),
    EditIdentifier(String),
    CommitIdentifier,
    AddItem { list: String, record: Map<String, Value> },
    RemoveItem { list: String, id: String },
    MoveItem { list: String, id: String, direction: Direction },
    FileSelected { path: String, file: web_sys::File },
    Save,
    SaveCompleted(PendingSave, Result<SaveSectionResponse, SyncError>),
    Publish,
    Reset,
    ResetCompleted(Result<(), SyncError>),
    LoadRemote { announce: bool },
    RemoteLoaded { result: Result<Option<SectionRecord>, SyncError>, announce: bool },
}
