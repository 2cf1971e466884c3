//! Exchange of drafts with the backend of record.
//!
//! [`RemoteSynchronizer`] turns a draft into a [`SaveSectionRequest`]:
//! validation first, then every image field is resolved. Inline images are
//! moved out of `fields` into the request's upload list, images the backend
//! already stored are replaced by their URL, and anything unresolvable goes
//! through the [`AssetPolicy`]. The transport itself sits behind
//! [`RemoteBackend`].

use std::collections::BTreeMap;

use serde_json::Value;

use super::asset::{AssetPolicy, AssetValue, classify};
use super::error::SyncError;
use super::store::FieldStore;
use crate::model::schema::SectionSchema;
use crate::model::section::SectionKind;
use crate::requests::{AssetUpload, SaveSectionRequest, SaveSectionResponse};

/// The backend of record. Implementations map transport failures onto
/// [`SyncError`] variants.
#[allow(async_fn_in_trait)]
pub trait RemoteBackend {
    async fn create(&self, request: &SaveSectionRequest) -> Result<SaveSectionResponse, SyncError>;

    async fn update(
        &self,
        record_id: &str,
        request: &SaveSectionRequest,
    ) -> Result<SaveSectionResponse, SyncError>;

    async fn delete(&self, kind: SectionKind, record_id: &str) -> Result<(), SyncError>;
}

/// A request ready to send, plus what is needed to reconcile the response.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSave {
    pub request: SaveSectionRequest,
    /// Digest of the inline value uploaded for each asset path.
    pub uploads: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct RemoteSynchronizer {
    policy: AssetPolicy,
}

impl RemoteSynchronizer {
    pub fn new(policy: AssetPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AssetPolicy {
        &self.policy
    }

    /// Builds the save request. Fails with `ValidationRejected` before any
    /// network traffic if the identifier or a schema rule is violated.
    pub fn prepare(
        &self,
        schema: &SectionSchema,
        identifier: &str,
        store: &FieldStore,
        server_assigned: &BTreeMap<String, String>,
    ) -> Result<PreparedSave, SyncError> {
        schema.validate(identifier, store)?;

        let mut payload = store.clone();
        let mut assets = Vec::new();
        let mut uploads = BTreeMap::new();

        for pattern in schema.asset_patterns() {
            for path in store.expand(&pattern) {
                let key = path.to_string();
                let Some(value) = store.get_str(&path) else {
                    continue;
                };
                let replacement = match (server_assigned.get(&key), classify(value)) {
                    (_, AssetValue::Empty) | (_, AssetValue::Remote(_)) => continue,
                    (Some(url), _) => url.clone(),
                    (None, AssetValue::Inline { content_type, data }) => {
                        assets.push(AssetUpload {
                            path: key.clone(),
                            content_type: content_type.to_string(),
                            data: data.to_string(),
                        });
                        uploads.insert(key.clone(), value_digest(value));
                        String::new()
                    }
                    (None, AssetValue::Unresolved(raw)) => match &self.policy {
                        AssetPolicy::Reject => {
                            return Err(SyncError::ValidationRejected(format!(
                                "The image at {key} is no longer available, please choose it again"
                            )));
                        }
                        AssetPolicy::Placeholder(url) => {
                            log::info!("using placeholder image for unresolved asset {key}");
                            url.clone()
                        }
                        AssetPolicy::PassThrough => raw.to_string(),
                    },
                };
                // The path was just read from the same fields, so this cannot miss.
                let _ = payload.set(&path, Value::String(replacement));
            }
        }

        Ok(PreparedSave {
            request: SaveSectionRequest {
                kind: schema.kind,
                identifier: identifier.trim().to_string(),
                fields: payload.fields().clone(),
                assets,
            },
            uploads,
        })
    }

    /// Updates the known record, or creates one. A record that disappeared on
    /// the backend is created again.
    pub async fn send<B: RemoteBackend>(
        &self,
        backend: &B,
        record_id: Option<&str>,
        request: &SaveSectionRequest,
    ) -> Result<SaveSectionResponse, SyncError> {
        if let Some(record_id) = record_id {
            match backend.update(record_id, request).await {
                Err(SyncError::NotFound) => {
                    log::info!(
                        "{} record {record_id} is gone, creating `{}` again",
                        request.kind,
                        request.identifier
                    );
                }
                other => return other,
            }
        }
        backend.create(request).await
    }

    /// Deletes the remote record. A record that is already gone counts as
    /// deleted.
    pub async fn delete<B: RemoteBackend>(
        &self,
        backend: &B,
        kind: SectionKind,
        record_id: &str,
    ) -> Result<(), SyncError> {
        match backend.delete(kind, record_id).await {
            Err(SyncError::NotFound) => {
                log::debug!("{kind} record {record_id} was already deleted");
                Ok(())
            }
            other => other,
        }
    }
}

pub(crate) fn value_digest(value: &str) -> String {
    format!("{:x}", md5::compute(value.as_bytes()))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::draft::asset::DEFAULT_PLACEHOLDER_URL;
    use crate::model::schema::{CAROUSEL_SCHEMA, FOOTER_SCHEMA};

    const PNG: &str = "data:image/png;base64,aGVsbG8=";

    #[derive(Default)]
    struct ScriptedBackend {
        update_result: Option<Result<SaveSectionResponse, SyncError>>,
        delete_result: Option<Result<(), SyncError>>,
        calls: RefCell<Vec<String>>,
    }

    impl RemoteBackend for ScriptedBackend {
        async fn create(&self, request: &SaveSectionRequest) -> Result<SaveSectionResponse, SyncError> {
            self.calls.borrow_mut().push(format!("create {}", request.identifier));
            Ok(SaveSectionResponse {
                record_id: "new".into(),
                asset_urls: BTreeMap::new(),
            })
        }

        async fn update(
            &self,
            record_id: &str,
            _request: &SaveSectionRequest,
        ) -> Result<SaveSectionResponse, SyncError> {
            self.calls.borrow_mut().push(format!("update {record_id}"));
            self.update_result.clone().unwrap_or(Err(SyncError::NotFound))
        }

        async fn delete(&self, _kind: SectionKind, record_id: &str) -> Result<(), SyncError> {
            self.calls.borrow_mut().push(format!("delete {record_id}"));
            self.delete_result.clone().unwrap_or(Ok(()))
        }
    }

    fn carousel(image: &str) -> FieldStore {
        FieldStore::new(json!({ "slides": [{ "id": "s1", "title": "Spring", "image": image }] }))
    }

    #[test]
    fn validation_happens_before_anything_else() {
        let sync = RemoteSynchronizer::default();
        let err = sync
            .prepare(&CAROUSEL_SCHEMA, "", &carousel(""), &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, SyncError::ValidationRejected(_)));
    }

    #[test]
    fn inline_images_become_uploads() {
        let sync = RemoteSynchronizer::default();
        let prepared = sync
            .prepare(&CAROUSEL_SCHEMA, "home", &carousel(PNG), &BTreeMap::new())
            .unwrap();

        assert_eq!(
            prepared.request.assets,
            [AssetUpload {
                path: "slides[#s1].image".into(),
                content_type: "image/png".into(),
                data: "aGVsbG8=".into(),
            }]
        );
        assert_eq!(prepared.request.fields["slides"][0]["image"], "");
        assert_eq!(prepared.uploads["slides[#s1].image"], value_digest(PNG));
    }

    #[test]
    fn stored_images_are_sent_as_urls() {
        let sync = RemoteSynchronizer::default();
        let assigned = BTreeMap::from([("slides[#s1].image".to_string(), "/assets/ab.png".to_string())]);
        let prepared = sync
            .prepare(&CAROUSEL_SCHEMA, "home", &carousel(PNG), &assigned)
            .unwrap();
        assert!(prepared.request.assets.is_empty());
        assert_eq!(prepared.request.fields["slides"][0]["image"], "/assets/ab.png");
    }

    #[test]
    fn unresolved_images_follow_the_policy() {
        let store = carousel("blob:http://localhost/42");

        let placeholder = RemoteSynchronizer::default()
            .prepare(&CAROUSEL_SCHEMA, "home", &store, &BTreeMap::new())
            .unwrap();
        assert_eq!(placeholder.request.fields["slides"][0]["image"], DEFAULT_PLACEHOLDER_URL);

        let passthrough = RemoteSynchronizer::new(AssetPolicy::PassThrough)
            .prepare(&CAROUSEL_SCHEMA, "home", &store, &BTreeMap::new())
            .unwrap();
        assert_eq!(passthrough.request.fields["slides"][0]["image"], "blob:http://localhost/42");

        let rejected = RemoteSynchronizer::new(AssetPolicy::Reject)
            .prepare(&CAROUSEL_SCHEMA, "home", &store, &BTreeMap::new());
        assert!(matches!(rejected, Err(SyncError::ValidationRejected(_))));
    }

    #[test]
    fn top_level_asset_fields_are_handled() {
        let store = FieldStore::new(json!({ "logoUrl": PNG }));
        let prepared = RemoteSynchronizer::default()
            .prepare(&FOOTER_SCHEMA, "main-footer", &store, &BTreeMap::new())
            .unwrap();
        assert_eq!(prepared.request.assets[0].path, "logoUrl");
        assert_eq!(prepared.request.fields["logoUrl"], "");
    }

    #[tokio::test]
    async fn send_falls_back_to_create_when_the_record_is_gone() {
        let backend = ScriptedBackend::default();
        let request = RemoteSynchronizer::default()
            .prepare(&CAROUSEL_SCHEMA, "home", &carousel(""), &BTreeMap::new())
            .unwrap()
            .request;

        let response = RemoteSynchronizer::default()
            .send(&backend, Some("old"), &request)
            .await
            .unwrap();
        assert_eq!(response.record_id, "new");
        assert_eq!(*backend.calls.borrow(), ["update old", "create home"]);
    }

    #[tokio::test]
    async fn send_surfaces_server_errors_from_update() {
        let backend = ScriptedBackend {
            update_result: Some(Err(SyncError::ServerError { status: 500, message: "boom".into() })),
            ..Default::default()
        };
        let request = RemoteSynchronizer::default()
            .prepare(&CAROUSEL_SCHEMA, "home", &carousel(""), &BTreeMap::new())
            .unwrap()
            .request;

        let err = RemoteSynchronizer::default()
            .send(&backend, Some("r1"), &request)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(*backend.calls.borrow(), ["update r1"]);
    }

    #[tokio::test]
    async fn delete_treats_missing_records_as_deleted() {
        let backend = ScriptedBackend {
            delete_result: Some(Err(SyncError::NotFound)),
            ..Default::default()
        };
        let sync = RemoteSynchronizer::default();
        assert_eq!(sync.delete(&backend, SectionKind::Team, "r1").await, Ok(()));
    }
}
