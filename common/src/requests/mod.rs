use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::section::SectionKind;

/// Inline image sent along with a save. `path` is the normalized field path
/// the image belongs to (`slides[#4f1c…].image`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUpload {
    pub path: String,
    pub content_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

/// Body of `POST /api/sections/{kind}` and `PUT /api/sections/{kind}/{record_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSectionRequest {
    pub kind: SectionKind,
    pub identifier: String,
    pub fields: Value,
    #[serde(default)]
    pub assets: Vec<AssetUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSectionResponse {
    pub record_id: String,
    /// Stored URL per uploaded asset, keyed by the upload's `path`.
    #[serde(default)]
    pub asset_urls: BTreeMap<String, String>,
}

/// A stored section as returned by the GET endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub record_id: String,
    pub kind: SectionKind,
    pub identifier: String,
    pub fields: Value,
    pub updated_at: String,
}

/// Error body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Query string of `GET /api/sections/{kind}?identifier=…`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierQuery {
    pub identifier: String,
}
