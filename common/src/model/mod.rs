pub mod carousel;
pub mod footer;
pub mod navbar;
pub mod newsletter;
pub mod schema;
pub mod section;
pub mod slug;
pub mod team;
pub mod testimonial;

use serde::{Deserialize, Serialize};

/// Width/height pair as CSS lengths (`"100%"`, `"60px"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: String,
    pub height: String,
}

impl Size {
    pub fn new(width: &str, height: &str) -> Self {
        Self {
            width: width.to_string(),
            height: height.to_string(),
        }
    }
}

/// Serializes a typed record into the JSON object shape used by list items
/// in a draft. The `id` key is dropped so the field store assigns a fresh one.
pub(crate) fn record_of<T: Serialize>(value: &T) -> serde_json::Map<String, serde_json::Value> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(mut map)) => {
            map.shift_remove("id");
            map
        }
        _ => serde_json::Map::new(),
    }
}
