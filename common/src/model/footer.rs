use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterColumn {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub links: Vec<FooterLink>,
}

impl FooterColumn {
    pub fn record(title: &str) -> Map<String, Value> {
        record_of(&FooterColumn {
            title: title.to_string(),
            ..Default::default()
        })
    }

    pub fn link_record(label: &str, href: &str) -> Map<String, Value> {
        record_of(&FooterLink {
            id: String::new(),
            label: label.to_string(),
            href: href.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Instagram,
    Whatsapp,
    Linkedin,
    Twitter,
    Facebook,
    Other,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 6] = [
        SocialProvider::Instagram,
        SocialProvider::Whatsapp,
        SocialProvider::Linkedin,
        SocialProvider::Twitter,
        SocialProvider::Facebook,
        SocialProvider::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Instagram => "instagram",
            SocialProvider::Whatsapp => "whatsapp",
            SocialProvider::Linkedin => "linkedin",
            SocialProvider::Twitter => "twitter",
            SocialProvider::Facebook => "facebook",
            SocialProvider::Other => "other",
        }
    }

    /// Example profile URL prefilled when the provider is picked.
    pub fn placeholder_href(&self) -> &'static str {
        match self {
            SocialProvider::Instagram => "https://instagram.com/yourprofile",
            SocialProvider::Whatsapp => "https://wa.me/1234567890",
            SocialProvider::Linkedin => "https://www.linkedin.com/in/yourprofile",
            SocialProvider::Twitter => "https://twitter.com/yourprofile",
            SocialProvider::Facebook => "https://facebook.com/yourpage",
            SocialProvider::Other => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterSocial {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub provider: SocialProvider,
    #[serde(default)]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_label: Option<String>,
}

impl FooterSocial {
    pub fn record(provider: SocialProvider) -> Map<String, Value> {
        record_of(&FooterSocial {
            id: String::new(),
            provider,
            href: provider.placeholder_href().to_string(),
            provider_label: (provider == SocialProvider::Other).then(String::new),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfig {
    pub logo_url: String,
    pub logo_alt: String,
    pub background_color: String,
    pub text_color: String,
    pub columns: Vec<FooterColumn>,
    pub show_newsletter: bool,
    pub copyright_text: String,
    pub social: Vec<FooterSocial>,
    pub gap: u32,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            logo_url: String::new(),
            logo_alt: String::new(),
            background_color: "#1976D2".to_string(),
            text_color: "#e6eef6".to_string(),
            columns: Vec::new(),
            show_newsletter: false,
            copyright_text: "© Your Company".to_string(),
            social: Vec::new(),
            gap: 20,
        }
    }
}
