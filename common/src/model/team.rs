use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record_of;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub avatar_url: String,
    pub email: String,
    pub linkedin: String,
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
}

impl TeamMember {
    pub fn record(name: &str) -> Map<String, Value> {
        record_of(&TeamMember {
            name: name.to_string(),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamConfig {
    pub heading: String,
    pub subheading: String,
    pub members: Vec<TeamMember>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            heading: "Meet the team".to_string(),
            subheading: String::new(),
            members: Vec::new(),
        }
    }
}
