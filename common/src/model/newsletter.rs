use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsletterConfig {
    pub headline: String,
    pub subheading: String,
    pub button_label: String,
    pub pill_text: String,
    pub show_privacy: bool,
    pub bg_color: String,
    pub bg_image: String,
    pub illustration_url: String,
    /// One of `style1` … `style6`.
    pub style: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            headline: "Stay in the loop".to_string(),
            subheading: "Product updates and exclusive offers, one email per week.".to_string(),
            button_label: "Join the newsletter".to_string(),
            pill_text: String::new(),
            show_privacy: true,
            bg_color: "#f6ad55".to_string(),
            bg_image: String::new(),
            illustration_url: String::new(),
            style: "style1".to_string(),
        }
    }
}
