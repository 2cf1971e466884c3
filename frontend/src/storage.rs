//! `window.localStorage` behind the mirror's [`KeyValueStore`] seam.
//!
//! Every call looks the storage up again: private browsing modes can revoke
//! it at any time, and the mirror handles the failure by degrading to memory.

use std::rc::Rc;

use common::draft::mirror::MirrorConfig;
use common::draft::{KeyValueStore, LocalMirror, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Result<Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| unavailable("no window"))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| unavailable("localStorage is disabled"))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::local()?.remove_item(key).map_err(js_error)
    }
}

/// A mirror over the browser's local storage with the default key prefix.
pub fn browser_mirror() -> LocalMirror {
    LocalMirror::new(Rc::new(BrowserStorage), MirrorConfig::default())
}

fn unavailable(reason: &str) -> StorageError {
    StorageError::LocalStorageUnavailable(reason.to_string())
}

fn js_error(err: JsValue) -> StorageError {
    let reason = err
        .as_string()
        .unwrap_or_else(|| format!("{err:?}"));
    StorageError::LocalStorageUnavailable(reason)
}
