use std::collections::BTreeMap;

use common::draft::{FieldPath, FieldStore, SyncError};
use common::model::section::SectionKind;
use common::requests::SaveSectionRequest;
use serde_json::Value;

use super::parse_kind;
use crate::config::Config;
use crate::error::ServiceError;
use crate::services::assets::store::store_uploads;

/// A save request that passed validation, with its images stored.
pub struct Accepted {
    pub kind: SectionKind,
    pub identifier: String,
    /// Fields with every uploaded image replaced by its URL.
    pub fields: Value,
    pub asset_urls: BTreeMap<String, String>,
}

/// Applies the same schema checks as the editor, then stores the uploads.
pub fn accept(
    config: &Config,
    raw_kind: &str,
    request: SaveSectionRequest,
) -> Result<Accepted, ServiceError> {
    let kind = parse_kind(raw_kind)?;
    if request.kind != kind {
        return Err(ServiceError::Validation(format!(
            "payload is a {} section, not {kind}",
            request.kind
        )));
    }
    if !request.fields.is_object() {
        return Err(ServiceError::Validation("fields must be a JSON object".to_string()));
    }

    let mut store = FieldStore::new(request.fields);
    kind.schema()
        .validate(&request.identifier, &store)
        .map_err(|err| match err {
            SyncError::ValidationRejected(message) => ServiceError::Validation(message),
            other => ServiceError::Validation(other.to_string()),
        })?;

    let asset_urls = store_uploads(config, &request.assets)?;
    for (path, url) in &asset_urls {
        let applied = FieldPath::parse(path)
            .ok()
            .and_then(|path| store.set(&path, Value::String(url.clone())).ok())
            .unwrap_or(false);
        if !applied {
            return Err(ServiceError::Validation(format!("no field at upload path {path}")));
        }
    }

    Ok(Accepted {
        kind,
        identifier: request.identifier.trim().to_string(),
        fields: store.fields().clone(),
        asset_urls,
    })
}
