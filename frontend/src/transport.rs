//! The backend of record over HTTP.
//!
//! Status codes map onto [`SyncError`] the way the backend produces them:
//! 400 carries a validation message, 404 a missing record, anything else
//! non-2xx a server error. A request that never got an answer is
//! `NetworkUnavailable`.

use common::draft::sync::RemoteBackend;
use common::draft::SyncError;
use common::model::section::SectionKind;
use common::requests::{ErrorBody, SaveSectionRequest, SaveSectionResponse, SectionRecord};
use gloo_net::http::{Request, Response};

/// Mount point of the section service.
pub const API_BASE: &str = "/api/sections";

#[derive(Debug, Clone, Copy, Default)]
pub struct HttpBackend;

impl RemoteBackend for HttpBackend {
    async fn create(&self, request: &SaveSectionRequest) -> Result<SaveSectionResponse, SyncError> {
        let resp = Request::post(&format!("{API_BASE}/{}", request.kind))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }

    async fn update(
        &self,
        record_id: &str,
        request: &SaveSectionRequest,
    ) -> Result<SaveSectionResponse, SyncError> {
        let resp = Request::put(&format!("{API_BASE}/{}/{record_id}", request.kind))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_json(resp).await
    }

    async fn delete(&self, kind: SectionKind, record_id: &str) -> Result<(), SyncError> {
        let resp = Request::delete(&format!("{API_BASE}/{kind}/{record_id}"))
            .send()
            .await
            .map_err(network)?;
        if resp.ok() {
            Ok(())
        } else {
            Err(failure(&resp).await)
        }
    }
}

impl HttpBackend {
    /// Latest saved record for `identifier`, or `None` if there is none.
    pub async fn find(
        &self,
        kind: SectionKind,
        identifier: &str,
    ) -> Result<Option<SectionRecord>, SyncError> {
        let resp = Request::get(&format!("{API_BASE}/{kind}"))
            .query([("identifier", identifier)])
            .send()
            .await
            .map_err(network)?;
        match read_json(resp).await {
            Ok(record) => Ok(Some(record)),
            Err(SyncError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, SyncError> {
    if !resp.ok() {
        return Err(failure(&resp).await);
    }
    resp.json::<T>().await.map_err(|err| SyncError::ServerError {
        status: resp.status(),
        message: format!("unexpected response body: {err}"),
    })
}

async fn failure(resp: &Response) -> SyncError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => resp.status_text(),
    };
    match status {
        400 | 422 => SyncError::ValidationRejected(message),
        404 => SyncError::NotFound,
        _ => SyncError::ServerError { status, message },
    }
}

fn network(err: gloo_net::Error) -> SyncError {
    SyncError::NetworkUnavailable(err.to_string())
}
