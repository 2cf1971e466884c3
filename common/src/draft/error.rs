use thiserror::Error;

/// Failures of the exchange with the backend of record.
///
/// Every variant leaves the draft untouched; the same save can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Rejected before or by the backend because the payload is invalid
    /// (missing identifier, bad slug, schema rule).
    #[error("{0}")]
    ValidationRejected(String),
    #[error("record not found")]
    NotFound,
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
}

impl SyncError {
    /// Transient failures the user can retry without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::ServerError { .. } | SyncError::NetworkUnavailable(_))
    }
}

/// Errors reported by [`crate::draft::DraftManager`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("a save is already in progress for this draft")]
    SaveInProgress,
    #[error("save the configuration before publishing it")]
    UnsavedChanges,
    /// A save response arrived for a draft that was reset or re-identified
    /// while the request was outstanding. Nothing was applied.
    #[error("discarded a response for a draft that has since changed identity")]
    StaleResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty field path")]
    Empty,
    #[error("malformed field path `{0}`")]
    Malformed(String),
    #[error("wildcards are only allowed in schema patterns: `{0}`")]
    Pattern(String),
    #[error("`{0}` does not hold a list")]
    NotAList(String),
    #[error("list item ids are assigned by the draft: `{0}`")]
    ItemId(String),
}

/// Raised by [`crate::draft::KeyValueStore`] implementations. The local mirror
/// swallows it and degrades to in-memory persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("local storage unavailable: {0}")]
    LocalStorageUnavailable(String),
}
