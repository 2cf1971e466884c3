//! Navigation bar configuration.
//!
//! A navbar is a list of components placed in one of three slots
//! (`left`, `center`, `right`), plus bar-wide styling. Each slot holds at
//! most [`MAX_COMPONENTS_PER_POSITION`] components.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Size, record_of};

pub const MAX_COMPONENTS_PER_POSITION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Center,
    #[default]
    Right,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Left, Position::Center, Position::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Center => "center",
            Position::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavbarComponentType {
    Logo,
    MenuLinks,
    SearchBar,
    CartIcon,
    ProfileIcon,
    ThemeToggle,
}

impl NavbarComponentType {
    pub const ALL: [NavbarComponentType; 6] = [
        NavbarComponentType::Logo,
        NavbarComponentType::MenuLinks,
        NavbarComponentType::SearchBar,
        NavbarComponentType::CartIcon,
        NavbarComponentType::ProfileIcon,
        NavbarComponentType::ThemeToggle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NavbarComponentType::Logo => "Logo (Upload/URL)",
            NavbarComponentType::MenuLinks => "Menu Links",
            NavbarComponentType::SearchBar => "Search Bar",
            NavbarComponentType::CartIcon => "Cart Icon",
            NavbarComponentType::ProfileIcon => "Profile Icon / Login-Signup",
            NavbarComponentType::ThemeToggle => "Theme Toggle",
        }
    }

    /// Slot a freshly added component lands in.
    pub fn default_position(&self) -> Position {
        match self {
            NavbarComponentType::MenuLinks => Position::Center,
            _ => Position::Right,
        }
    }

    pub fn default_config(&self) -> ComponentConfig {
        let mut config = ComponentConfig::default();
        match self {
            NavbarComponentType::Logo => {
                config.src = Some(String::new());
                config.alt = Some("Logo".to_string());
            }
            NavbarComponentType::MenuLinks => {
                config.links = vec![MenuLink::new("Home", "/")];
            }
            NavbarComponentType::SearchBar => config.placeholder = Some("Search...".to_string()),
            NavbarComponentType::CartIcon => config.count = Some(0),
            NavbarComponentType::ProfileIcon => {
                config.src = Some(String::new());
                config.initials = Some("U".to_string());
                config.login_url = Some("/login".to_string());
                config.signup_url = Some("/signup".to_string());
            }
            NavbarComponentType::ThemeToggle => config.current_theme = Some(NavbarTheme::Light),
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLink {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub label: String,
    pub path: String,
}

impl MenuLink {
    pub fn new(label: &str, path: &str) -> Self {
        Self {
            id: String::new(),
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// Per-component settings. Which keys are meaningful depends on the
/// component type; unused ones are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<MenuLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_theme: Option<NavbarTheme>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavbarComponent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: NavbarComponentType,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_sequence")]
    pub sequence: u32,
    #[serde(default)]
    pub config: ComponentConfig,
}

fn default_sequence() -> u32 {
    1
}

impl NavbarComponent {
    pub fn new(component_type: NavbarComponentType) -> Self {
        Self {
            id: String::new(),
            component_type,
            position: component_type.default_position(),
            sequence: default_sequence(),
            config: component_type.default_config(),
        }
    }

    /// JSON record ready for `FieldStore::append_item`.
    pub fn record(component_type: NavbarComponentType) -> Map<String, Value> {
        record_of(&Self::new(component_type))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarTheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarStyle {
    Round,
    Square,
    Shadow,
    Floating,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarConfig {
    #[serde(default)]
    pub components: Vec<NavbarComponent>,
    #[serde(default)]
    pub theme: NavbarTheme,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub style: NavbarStyle,
    #[serde(default = "default_size")]
    pub size: Size,
}

fn default_color() -> String {
    "#1976d2".to_string()
}

fn default_size() -> Size {
    Size::new("100%", "60px")
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            theme: NavbarTheme::default(),
            color: default_color(),
            style: NavbarStyle::default(),
            size: default_size(),
        }
    }
}

impl NavbarConfig {
    /// Components in render order: left slot, then center, then right,
    /// keeping list order inside each slot.
    pub fn display_order(&self) -> Vec<&NavbarComponent> {
        Position::ALL
            .iter()
            .flat_map(|position| self.components.iter().filter(move |c| c.position == *position))
            .collect()
    }
}
