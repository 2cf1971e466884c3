use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Size, record_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarouselStyle {
    #[default]
    Hero,
    Card,
    Uneven,
    Center,
    Bootstrap,
}

impl CarouselStyle {
    pub fn label(&self) -> &'static str {
        match self {
            CarouselStyle::Hero => "Hero Carousel",
            CarouselStyle::Card => "Card Carousel",
            CarouselStyle::Uneven => "Uneven Sets",
            CarouselStyle::Center => "Center Mode",
            CarouselStyle::Bootstrap => "Bootstrap Style",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slide {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_href: String,
    pub image: String,
    pub dark_overlay: bool,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            subtitle: String::new(),
            cta_text: String::new(),
            cta_href: String::new(),
            image: String::new(),
            dark_overlay: true,
        }
    }
}

impl Slide {
    pub fn record(title: &str) -> Map<String, Value> {
        record_of(&Slide {
            title: title.to_string(),
            ..Default::default()
        })
    }

    /// A slide needs at least some visible content.
    pub fn has_content(&self) -> bool {
        [&self.title, &self.subtitle, &self.cta_text, &self.image]
            .iter()
            .any(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselConfig {
    pub style: CarouselStyle,
    pub size: Size,
    pub interval_ms: u32,
    pub slides: Vec<Slide>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            style: CarouselStyle::default(),
            size: Size::new("100%", "500px"),
            interval_ms: 5000,
            slides: Vec::new(),
        }
    }
}
