//! Writes uploaded images to the asset directory.
//!
//! Files are named by the MD5 digest of their bytes, so uploading the same
//! image twice stores it once and yields the same URL.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::draft::asset::extension_for;
use common::requests::AssetUpload;
use regex::Regex;

use crate::config::Config;
use crate::error::ServiceError;

static ASSET_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{32}\.[a-z]{2,4}$").expect("valid asset name regex"));

/// True for names produced by [`store_uploads`]; anything else is refused
/// when serving files.
pub fn is_asset_name(name: &str) -> bool {
    ASSET_NAME_RE.is_match(name)
}

/// Stores every upload and returns the public URL per upload path.
pub fn store_uploads(
    config: &Config,
    uploads: &[AssetUpload],
) -> Result<BTreeMap<String, String>, ServiceError> {
    if uploads.is_empty() {
        return Ok(BTreeMap::new());
    }
    fs::create_dir_all(&config.asset_dir)?;

    let mut urls = BTreeMap::new();
    for upload in uploads {
        if !upload.content_type.starts_with("image/") {
            return Err(ServiceError::Validation(format!(
                "{} is not an image ({})",
                upload.path, upload.content_type
            )));
        }
        let bytes = STANDARD.decode(upload.data.as_bytes()).map_err(|e| {
            ServiceError::Validation(format!("{} is not valid base64: {e}", upload.path))
        })?;
        let name = write_asset(&config.asset_dir, &upload.content_type, &bytes)?;
        urls.insert(upload.path.clone(), config.asset_url(&name));
    }
    Ok(urls)
}

fn write_asset(dir: &Path, content_type: &str, bytes: &[u8]) -> Result<String, ServiceError> {
    let name = format!("{:x}.{}", md5::compute(bytes), extension_for(content_type));
    let target = dir.join(&name);
    if target.exists() {
        log::debug!("asset {name} already stored");
    } else {
        fs::write(&target, bytes)?;
        log::info!("stored asset {name} ({} bytes)", bytes.len());
    }
    Ok(name)
}
