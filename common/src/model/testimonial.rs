use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record_of;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub position: String,
    pub company: String,
    pub text: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub is_active: bool,
}

impl TestimonialItem {
    pub fn record(name: &str) -> Map<String, Value> {
        record_of(&TestimonialItem {
            name: name.to_string(),
            rating: Some(5),
            is_active: true,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialsConfig {
    /// One of `styleA` … `styleF`.
    pub preset: String,
    pub slider_enabled: bool,
    pub loop_enabled: bool,
    pub interval_seconds: u32,
    pub items: Vec<TestimonialItem>,
}

impl Default for TestimonialsConfig {
    fn default() -> Self {
        Self {
            preset: "styleA".to_string(),
            slider_enabled: false,
            loop_enabled: false,
            interval_seconds: 4,
            items: Vec::new(),
        }
    }
}
