//! Image fields and how they travel to the backend.
//!
//! An asset field holds either a remote URL (already stored somewhere), an
//! inline `data:` URI produced by the editor's file picker, or nothing. Inline
//! data is uploaded with the save request and replaced by the URL the backend
//! hands back. Anything else is resolved through an [`AssetPolicy`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://via.placeholder.com/150x50/1976d2/ffffff?text=Logo";

/// What to send for an asset value that is neither a URL nor inline data
/// (a bare file name, a `blob:` reference that did not survive a reload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPolicy {
    /// Refuse to save until the user picks the image again.
    Reject,
    /// Send this URL instead.
    Placeholder(String),
    /// Send the value unchanged and let the renderer deal with it.
    PassThrough,
}

impl Default for AssetPolicy {
    fn default() -> Self {
        AssetPolicy::Placeholder(DEFAULT_PLACEHOLDER_URL.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValue<'a> {
    Empty,
    Remote(&'a str),
    Inline { content_type: &'a str, data: &'a str },
    Unresolved(&'a str),
}

pub fn classify(value: &str) -> AssetValue<'_> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return AssetValue::Empty;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") || trimmed.starts_with('/')
    {
        return AssetValue::Remote(trimmed);
    }
    match parse_data_uri(trimmed) {
        Some((content_type, data)) => AssetValue::Inline { content_type, data },
        None => AssetValue::Unresolved(trimmed),
    }
}

/// Splits `data:<type>;base64,<payload>` and checks the payload decodes.
pub fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let content_type = header.strip_suffix(";base64")?;
    if data.is_empty() || STANDARD.decode(data).is_err() {
        return None;
    }
    let content_type = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };
    Some((content_type, data))
}

pub fn to_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// File extension used when storing an upload of the given type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        _ => "bin",
    }
}
