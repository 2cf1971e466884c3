use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::schema::{
    CAROUSEL_SCHEMA, FOOTER_SCHEMA, NAVBAR_SCHEMA, NEWSLETTER_SCHEMA, SectionSchema, TEAM_SCHEMA,
    TESTIMONIALS_SCHEMA,
};

/// The page sections a user can compose in the dashboard.
///
/// Serialized in `snake_case`; the same string is used as the REST path
/// segment (`/api/sections/{kind}`) and inside local storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Navbar,
    Footer,
    Carousel,
    Testimonials,
    Team,
    Newsletter,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Navbar,
        SectionKind::Carousel,
        SectionKind::Testimonials,
        SectionKind::Team,
        SectionKind::Newsletter,
        SectionKind::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Navbar => "navbar",
            SectionKind::Footer => "footer",
            SectionKind::Carousel => "carousel",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Team => "team",
            SectionKind::Newsletter => "newsletter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Navbar => "Navbar",
            SectionKind::Footer => "Footer",
            SectionKind::Carousel => "Carousel",
            SectionKind::Testimonials => "Testimonials",
            SectionKind::Team => "Team",
            SectionKind::Newsletter => "Newsletter",
        }
    }

    /// Schema driving the editor form, validation and asset handling.
    pub fn schema(&self) -> &'static SectionSchema {
        match self {
            SectionKind::Navbar => &NAVBAR_SCHEMA,
            SectionKind::Footer => &FOOTER_SCHEMA,
            SectionKind::Carousel => &CAROUSEL_SCHEMA,
            SectionKind::Testimonials => &TESTIMONIALS_SCHEMA,
            SectionKind::Team => &TEAM_SCHEMA,
            SectionKind::Newsletter => &NEWSLETTER_SCHEMA,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section kind `{0}`")]
pub struct UnknownSectionKind(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSectionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSectionKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_round_trip_through_from_str_and_serde() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.as_str().parse::<SectionKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!("sidebar".parse::<SectionKind>().is_err());
    }

    #[test]
    fn every_kind_points_at_its_own_schema() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.schema().kind, kind);
        }
    }
}
