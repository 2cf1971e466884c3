//! Per-section schemas.
//!
//! One [`SectionSchema`] per [`SectionKind`] describes the editable fields
//! (what the editor renders), the image fields (what the synchronizer
//! uploads), the validation rules checked before a save, and the default
//! field values of a new draft.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::carousel::{CarouselConfig, Slide};
use super::footer::{FooterColumn, FooterConfig, FooterSocial, SocialProvider};
use super::navbar::{MAX_COMPONENTS_PER_POSITION, MenuLink, NavbarComponent, NavbarComponentType, NavbarConfig};
use super::newsletter::NewsletterConfig;
use super::record_of;
use super::section::SectionKind;
use super::slug::{is_hex_color, is_valid_slug};
use super::team::{TeamConfig, TeamMember};
use super::testimonial::{TestimonialItem, TestimonialsConfig};
use crate::draft::error::SyncError;
use crate::draft::path::FieldPath;
use crate::draft::store::FieldStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRule {
    NonEmpty,
    /// Lowercase letters, digits and single hyphens.
    Slug,
}

/// A button offered by the editor to add an item to a list.
#[derive(Debug, Clone, Copy)]
pub struct ItemTemplate {
    pub label: &'static str,
    pub build: fn() -> Map<String, Value>,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    LongText,
    Color,
    Toggle,
    Number { min: i64, max: i64 },
    /// URL or uploaded image; listed in [`SectionSchema::asset_fields`].
    Image,
    Choice(&'static [&'static str]),
    /// List of records. Item field paths are relative to the item, and the
    /// editor only shows the ones present on a given item.
    List {
        item_fields: &'static [FieldSpec],
        /// Item key used as the card title.
        item_label: &'static str,
        templates: &'static [ItemTemplate],
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(path: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { path, label, kind }
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    MinItems {
        list: &'static str,
        min: usize,
        message: &'static str,
    },
    /// At most `max` items of `list` may share the same value of `group_by`.
    MaxItemsPerGroup {
        list: &'static str,
        group_by: &'static str,
        max: usize,
    },
    /// Empty values are allowed. `path` may contain `[*]`.
    HexColor { path: &'static str, label: &'static str },
    /// Missing values are allowed. `path` may contain `[*]`.
    Range {
        path: &'static str,
        label: &'static str,
        min: i64,
        max: i64,
    },
}

#[derive(Debug)]
pub struct SectionSchema {
    pub kind: SectionKind,
    pub identifier_label: &'static str,
    pub identifier_rule: IdentifierRule,
    pub fields: &'static [FieldSpec],
    /// Field path patterns holding images.
    pub asset_fields: &'static [&'static str],
    pub rules: &'static [Rule],
    pub defaults: fn() -> Value,
}

impl SectionSchema {
    /// Checks the identifier and every rule. The first failure is reported
    /// with a message meant for the user.
    pub fn validate(&self, identifier: &str, store: &FieldStore) -> Result<(), SyncError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(SyncError::ValidationRejected(format!(
                "{} is required",
                self.identifier_label
            )));
        }
        if self.identifier_rule == IdentifierRule::Slug && !is_valid_slug(identifier) {
            return Err(SyncError::ValidationRejected(format!(
                "{} must use lowercase letters, numbers and single hyphens (e.g. main-footer)",
                self.identifier_label
            )));
        }
        self.rules.iter().try_for_each(|rule| check(rule, store))
    }

    pub fn asset_patterns(&self) -> Vec<FieldPath> {
        self.asset_fields
            .iter()
            .filter_map(|pattern| match FieldPath::parse(pattern) {
                Ok(path) => Some(path),
                Err(err) => {
                    log::error!("bad asset pattern in {} schema: {err}", self.kind);
                    None
                }
            })
            .collect()
    }
}

fn check(rule: &Rule, store: &FieldStore) -> Result<(), SyncError> {
    let reject = |message: String| Err(SyncError::ValidationRejected(message));
    match *rule {
        Rule::MinItems { list, min, message } => {
            let count = items(store, list).len();
            if count < min {
                return reject(message.to_string());
            }
        }
        Rule::MaxItemsPerGroup { list, group_by, max } => {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for item in items(store, list) {
                let group = item.get(group_by).and_then(Value::as_str).unwrap_or_default();
                let count = counts.entry(group).or_default();
                *count += 1;
                if *count > max {
                    return reject(format!("At most {max} items are allowed in the {group} position"));
                }
            }
        }
        Rule::HexColor { path, label } => {
            for value in values(store, path) {
                let color = value.as_str().unwrap_or_default();
                if !color.is_empty() && !is_hex_color(color) {
                    return reject(format!("{label} must be a hex color like #1976d2"));
                }
            }
        }
        Rule::Range { path, label, min, max } => {
            for value in values(store, path) {
                if value.is_null() {
                    continue;
                }
                let in_range = value
                    .as_f64()
                    .is_some_and(|n| n >= min as f64 && n <= max as f64);
                if !in_range {
                    return reject(format!("{label} must be between {min} and {max}"));
                }
            }
        }
    }
    Ok(())
}

fn items<'a>(store: &'a FieldStore, list: &str) -> &'a [Value] {
    FieldPath::parse(list)
        .ok()
        .and_then(|path| store.get(&path))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn values<'a>(store: &'a FieldStore, pattern: &str) -> Vec<&'a Value> {
    let Ok(pattern) = FieldPath::parse(pattern) else {
        return Vec::new();
    };
    store
        .expand(&pattern)
        .iter()
        .filter_map(|path| store.get(path))
        .collect()
}

fn defaults_of<T: Serialize + Default>() -> Value {
    serde_json::to_value(T::default()).unwrap_or_else(|_| Value::Object(Map::new()))
}

// Navbar

fn new_logo() -> Map<String, Value> {
    NavbarComponent::record(NavbarComponentType::Logo)
}
fn new_menu_links() -> Map<String, Value> {
    NavbarComponent::record(NavbarComponentType::MenuLinks)
}
fn new_search_bar() -> Map<String, Value> {
    NavbarComponent::record(NavbarComponentType::SearchBar)
}
fn new_cart_icon() -> Map<String, Value> {
    NavbarComponent::record(NavbarComponentType::CartIcon)
}
fn new_profile_icon() -> Map<String, Value> {
    NavbarComponent::record(NavbarComponentType::ProfileIcon)
}
fn new_theme_toggle() -> Map<String, Value> {
    NavbarComponent::record(NavbarComponentType::ThemeToggle)
}
fn new_menu_link() -> Map<String, Value> {
    record_of(&MenuLink::new("New link", "/"))
}

const POSITIONS: &[&str] = &["left", "center", "right"];

const MENU_LINK_TEMPLATES: &[ItemTemplate] = &[ItemTemplate { label: "Link", build: new_menu_link }];

const MENU_LINK_FIELDS: &[FieldSpec] = &[
    field("label", "Label", FieldKind::Text),
    field("path", "Path", FieldKind::Text),
];

const NAVBAR_COMPONENT_FIELDS: &[FieldSpec] = &[
    field("position", "Position", FieldKind::Choice(POSITIONS)),
    field("sequence", "Order", FieldKind::Number { min: 1, max: 99 }),
    field("config.src", "Image", FieldKind::Image),
    field("config.alt", "Alt text", FieldKind::Text),
    field("config.placeholder", "Placeholder", FieldKind::Text),
    field("config.count", "Badge count", FieldKind::Number { min: 0, max: 999 }),
    field("config.initials", "Initials", FieldKind::Text),
    field("config.loginUrl", "Login URL", FieldKind::Text),
    field("config.signupUrl", "Signup URL", FieldKind::Text),
    field("config.currentTheme", "Theme", FieldKind::Choice(&["light", "dark"])),
    field(
        "config.links",
        "Links",
        FieldKind::List {
            item_fields: MENU_LINK_FIELDS,
            item_label: "label",
            templates: MENU_LINK_TEMPLATES,
        },
    ),
];

const NAVBAR_COMPONENT_TEMPLATES: &[ItemTemplate] = &[
    ItemTemplate { label: "Logo", build: new_logo },
    ItemTemplate { label: "Menu Links", build: new_menu_links },
    ItemTemplate { label: "Search Bar", build: new_search_bar },
    ItemTemplate { label: "Cart Icon", build: new_cart_icon },
    ItemTemplate { label: "Profile Icon", build: new_profile_icon },
    ItemTemplate { label: "Theme Toggle", build: new_theme_toggle },
];

const NAVBAR_FIELDS: &[FieldSpec] = &[
    field("theme", "Theme", FieldKind::Choice(&["light", "dark"])),
    field("color", "Bar color", FieldKind::Color),
    field(
        "style",
        "Style",
        FieldKind::Choice(&["none", "round", "square", "shadow", "floating"]),
    ),
    field("size.width", "Width", FieldKind::Text),
    field("size.height", "Height", FieldKind::Text),
    field(
        "components",
        "Components",
        FieldKind::List {
            item_fields: NAVBAR_COMPONENT_FIELDS,
            item_label: "type",
            templates: NAVBAR_COMPONENT_TEMPLATES,
        },
    ),
];

pub static NAVBAR_SCHEMA: SectionSchema = SectionSchema {
    kind: SectionKind::Navbar,
    identifier_label: "Site ID",
    identifier_rule: IdentifierRule::NonEmpty,
    fields: NAVBAR_FIELDS,
    asset_fields: &["components[*].config.src"],
    rules: &[
        Rule::MaxItemsPerGroup {
            list: "components",
            group_by: "position",
            max: MAX_COMPONENTS_PER_POSITION,
        },
        Rule::HexColor { path: "color", label: "Bar color" },
    ],
    defaults: defaults_of::<NavbarConfig>,
};

// Footer

fn new_column() -> Map<String, Value> {
    FooterColumn::record("New column")
}
fn new_footer_link() -> Map<String, Value> {
    FooterColumn::link_record("New link", "#")
}
fn new_instagram() -> Map<String, Value> {
    FooterSocial::record(SocialProvider::Instagram)
}
fn new_whatsapp() -> Map<String, Value> {
    FooterSocial::record(SocialProvider::Whatsapp)
}
fn new_linkedin() -> Map<String, Value> {
    FooterSocial::record(SocialProvider::Linkedin)
}
fn new_twitter() -> Map<String, Value> {
    FooterSocial::record(SocialProvider::Twitter)
}
fn new_facebook() -> Map<String, Value> {
    FooterSocial::record(SocialProvider::Facebook)
}
fn new_other_social() -> Map<String, Value> {
    FooterSocial::record(SocialProvider::Other)
}

const FOOTER_LINK_TEMPLATES: &[ItemTemplate] =
    &[ItemTemplate { label: "Link", build: new_footer_link }];

const FOOTER_LINK_FIELDS: &[FieldSpec] = &[
    field("label", "Label", FieldKind::Text),
    field("href", "URL", FieldKind::Text),
];

const FOOTER_COLUMN_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text),
    field(
        "links",
        "Links",
        FieldKind::List {
            item_fields: FOOTER_LINK_FIELDS,
            item_label: "label",
            templates: FOOTER_LINK_TEMPLATES,
        },
    ),
];

const FOOTER_SOCIAL_FIELDS: &[FieldSpec] = &[
    field(
        "provider",
        "Provider",
        FieldKind::Choice(&["instagram", "whatsapp", "linkedin", "twitter", "facebook", "other"]),
    ),
    field("providerLabel", "Name", FieldKind::Text),
    field("href", "URL", FieldKind::Text),
];

const FOOTER_COLUMN_TEMPLATES: &[ItemTemplate] =
    &[ItemTemplate { label: "Column", build: new_column }];

const FOOTER_SOCIAL_TEMPLATES: &[ItemTemplate] = &[
    ItemTemplate { label: "Instagram", build: new_instagram },
    ItemTemplate { label: "WhatsApp", build: new_whatsapp },
    ItemTemplate { label: "LinkedIn", build: new_linkedin },
    ItemTemplate { label: "Twitter", build: new_twitter },
    ItemTemplate { label: "Facebook", build: new_facebook },
    ItemTemplate { label: "Other", build: new_other_social },
];

const FOOTER_FIELDS: &[FieldSpec] = &[
    field("logoUrl", "Logo", FieldKind::Image),
    field("logoAlt", "Logo alt text", FieldKind::Text),
    field("backgroundColor", "Background", FieldKind::Color),
    field("textColor", "Text color", FieldKind::Color),
    field("gap", "Column gap (px)", FieldKind::Number { min: 0, max: 200 }),
    field("showNewsletter", "Show newsletter", FieldKind::Toggle),
    field("copyrightText", "Copyright", FieldKind::Text),
    field(
        "columns",
        "Columns",
        FieldKind::List {
            item_fields: FOOTER_COLUMN_FIELDS,
            item_label: "title",
            templates: FOOTER_COLUMN_TEMPLATES,
        },
    ),
    field(
        "social",
        "Social links",
        FieldKind::List {
            item_fields: FOOTER_SOCIAL_FIELDS,
            item_label: "provider",
            templates: FOOTER_SOCIAL_TEMPLATES,
        },
    ),
];

pub static FOOTER_SCHEMA: SectionSchema = SectionSchema {
    kind: SectionKind::Footer,
    identifier_label: "Footer slug",
    identifier_rule: IdentifierRule::Slug,
    fields: FOOTER_FIELDS,
    asset_fields: &["logoUrl"],
    rules: &[
        Rule::HexColor { path: "backgroundColor", label: "Background" },
        Rule::HexColor { path: "textColor", label: "Text color" },
        Rule::Range { path: "gap", label: "Column gap", min: 0, max: 200 },
    ],
    defaults: defaults_of::<FooterConfig>,
};

// Carousel

fn new_slide() -> Map<String, Value> {
    Slide::record("New slide")
}

const SLIDE_TEMPLATES: &[ItemTemplate] = &[ItemTemplate { label: "Slide", build: new_slide }];

const SLIDE_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text),
    field("subtitle", "Subtitle", FieldKind::LongText),
    field("ctaText", "Button text", FieldKind::Text),
    field("ctaHref", "Button link", FieldKind::Text),
    field("image", "Image", FieldKind::Image),
    field("darkOverlay", "Dark overlay", FieldKind::Toggle),
];

const CAROUSEL_FIELDS: &[FieldSpec] = &[
    field(
        "style",
        "Style",
        FieldKind::Choice(&["hero", "card", "uneven", "center", "bootstrap"]),
    ),
    field("size.width", "Width", FieldKind::Text),
    field("size.height", "Height", FieldKind::Text),
    field("intervalMs", "Autoplay interval (ms)", FieldKind::Number { min: 1000, max: 60000 }),
    field(
        "slides",
        "Slides",
        FieldKind::List {
            item_fields: SLIDE_FIELDS,
            item_label: "title",
            templates: SLIDE_TEMPLATES,
        },
    ),
];

pub static CAROUSEL_SCHEMA: SectionSchema = SectionSchema {
    kind: SectionKind::Carousel,
    identifier_label: "Carousel name",
    identifier_rule: IdentifierRule::NonEmpty,
    fields: CAROUSEL_FIELDS,
    asset_fields: &["slides[*].image"],
    rules: &[
        Rule::MinItems {
            list: "slides",
            min: 1,
            message: "Add at least one slide before saving",
        },
        Rule::Range { path: "intervalMs", label: "Autoplay interval", min: 1000, max: 60000 },
    ],
    defaults: defaults_of::<CarouselConfig>,
};

// Testimonials

fn new_testimonial() -> Map<String, Value> {
    TestimonialItem::record("New testimonial")
}

const TESTIMONIAL_TEMPLATES: &[ItemTemplate] =
    &[ItemTemplate { label: "Testimonial", build: new_testimonial }];

const TESTIMONIAL_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text),
    field("position", "Position", FieldKind::Text),
    field("company", "Company", FieldKind::Text),
    field("text", "Quote", FieldKind::LongText),
    field("image", "Photo", FieldKind::Image),
    field("rating", "Rating", FieldKind::Number { min: 1, max: 5 }),
    field("isActive", "Active", FieldKind::Toggle),
];

const TESTIMONIALS_FIELDS: &[FieldSpec] = &[
    field("preset", "Layout", FieldKind::Choice(&["styleA", "styleB", "styleC"])),
    field("sliderEnabled", "Slider", FieldKind::Toggle),
    field("loopEnabled", "Loop", FieldKind::Toggle),
    field("intervalSeconds", "Interval (s)", FieldKind::Number { min: 1, max: 60 }),
    field(
        "items",
        "Testimonials",
        FieldKind::List {
            item_fields: TESTIMONIAL_FIELDS,
            item_label: "name",
            templates: TESTIMONIAL_TEMPLATES,
        },
    ),
];

pub static TESTIMONIALS_SCHEMA: SectionSchema = SectionSchema {
    kind: SectionKind::Testimonials,
    identifier_label: "Section name",
    identifier_rule: IdentifierRule::NonEmpty,
    fields: TESTIMONIALS_FIELDS,
    asset_fields: &["items[*].image"],
    rules: &[
        Rule::Range { path: "items[*].rating", label: "Rating", min: 1, max: 5 },
        Rule::Range { path: "intervalSeconds", label: "Interval", min: 1, max: 60 },
    ],
    defaults: defaults_of::<TestimonialsConfig>,
};

// Team

fn new_member() -> Map<String, Value> {
    TeamMember::record("New member")
}

const MEMBER_TEMPLATES: &[ItemTemplate] = &[ItemTemplate { label: "Member", build: new_member }];

const MEMBER_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text),
    field("role", "Role", FieldKind::Text),
    field("bio", "Bio", FieldKind::LongText),
    field("avatarUrl", "Photo", FieldKind::Image),
    field("email", "Email", FieldKind::Text),
    field("linkedin", "LinkedIn", FieldKind::Text),
    field("twitter", "Twitter", FieldKind::Text),
    field("facebook", "Facebook", FieldKind::Text),
    field("instagram", "Instagram", FieldKind::Text),
];

const TEAM_FIELDS: &[FieldSpec] = &[
    field("heading", "Heading", FieldKind::Text),
    field("subheading", "Subheading", FieldKind::LongText),
    field(
        "members",
        "Members",
        FieldKind::List {
            item_fields: MEMBER_FIELDS,
            item_label: "name",
            templates: MEMBER_TEMPLATES,
        },
    ),
];

pub static TEAM_SCHEMA: SectionSchema = SectionSchema {
    kind: SectionKind::Team,
    identifier_label: "Section name",
    identifier_rule: IdentifierRule::NonEmpty,
    fields: TEAM_FIELDS,
    asset_fields: &["members[*].avatarUrl"],
    rules: &[],
    defaults: defaults_of::<TeamConfig>,
};

// Newsletter

const NEWSLETTER_FIELDS: &[FieldSpec] = &[
    field("headline", "Headline", FieldKind::Text),
    field("subheading", "Subheading", FieldKind::LongText),
    field("buttonLabel", "Button label", FieldKind::Text),
    field("pillText", "Pill text", FieldKind::Text),
    field("showPrivacy", "Show privacy note", FieldKind::Toggle),
    field("bgColor", "Background", FieldKind::Color),
    field("bgImage", "Background image", FieldKind::Image),
    field("illustrationUrl", "Illustration", FieldKind::Image),
    field("style", "Style", FieldKind::Choice(&["style1", "style2", "style3"])),
];

pub static NEWSLETTER_SCHEMA: SectionSchema = SectionSchema {
    kind: SectionKind::Newsletter,
    identifier_label: "Section name",
    identifier_rule: IdentifierRule::NonEmpty,
    fields: NEWSLETTER_FIELDS,
    asset_fields: &["bgImage", "illustrationUrl"],
    rules: &[Rule::HexColor { path: "bgColor", label: "Background" }],
    defaults: defaults_of::<NewsletterConfig>,
};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store(fields: Value) -> FieldStore {
        FieldStore::new(fields)
    }

    fn rejected(result: Result<(), SyncError>) -> String {
        match result {
            Err(SyncError::ValidationRejected(message)) => message,
            other => panic!("expected a validation failure, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_objects_that_pass_their_own_rules_where_possible() {
        for kind in SectionKind::ALL {
            let schema = kind.schema();
            let defaults = (schema.defaults)();
            assert!(defaults.is_object(), "{kind} defaults");
            if kind != SectionKind::Carousel {
                assert_eq!(schema.validate("site-1", &store(defaults)), Ok(()), "{kind}");
            }
        }
    }

    #[test]
    fn identifier_is_required() {
        let message = rejected(NAVBAR_SCHEMA.validate("  ", &store(json!({}))));
        assert_eq!(message, "Site ID is required");
    }

    #[test]
    fn footer_identifier_must_be_a_slug() {
        let fields = (FOOTER_SCHEMA.defaults)();
        rejected(FOOTER_SCHEMA.validate("Main Footer", &store(fields.clone())));
        assert_eq!(FOOTER_SCHEMA.validate("main-footer", &store(fields)), Ok(()));
    }

    #[test]
    fn carousel_needs_a_slide() {
        let message = rejected(CAROUSEL_SCHEMA.validate("home", &store(json!({ "slides": [] }))));
        assert_eq!(message, "Add at least one slide before saving");
        assert_eq!(
            CAROUSEL_SCHEMA.validate("home", &store(json!({ "slides": [{ "id": "a" }] }))),
            Ok(())
        );
    }

    #[test]
    fn navbar_positions_hold_at_most_four_components() {
        let five: Vec<Value> = (0..5)
            .map(|i| json!({ "id": format!("c{i}"), "type": "cartIcon", "position": "right" }))
            .collect();
        let message = rejected(NAVBAR_SCHEMA.validate("site", &store(json!({ "components": five }))));
        assert_eq!(message, "At most 4 items are allowed in the right position");

        let spread: Vec<Value> = (0..5)
            .map(|i| {
                let position = if i < 4 { "left" } else { "right" };
                json!({ "id": format!("c{i}"), "type": "cartIcon", "position": position })
            })
            .collect();
        assert_eq!(NAVBAR_SCHEMA.validate("site", &store(json!({ "components": spread }))), Ok(()));
    }

    #[test]
    fn colors_must_be_hex_when_set() {
        rejected(NAVBAR_SCHEMA.validate("site", &store(json!({ "color": "blue" }))));
        assert_eq!(NAVBAR_SCHEMA.validate("site", &store(json!({ "color": "" }))), Ok(()));
    }

    #[test]
    fn ratings_are_checked_on_every_item() {
        let fields = json!({ "items": [{ "id": "a", "rating": 5 }, { "id": "b", "rating": 9 }] });
        let message = rejected(TESTIMONIALS_SCHEMA.validate("home", &store(fields)));
        assert_eq!(message, "Rating must be between 1 and 5");
        let unrated = json!({ "items": [{ "id": "a" }] });
        assert_eq!(TESTIMONIALS_SCHEMA.validate("home", &store(unrated)), Ok(()));
    }

    #[test]
    fn asset_patterns_parse() {
        for kind in SectionKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema.asset_patterns().len(), schema.asset_fields.len());
        }
    }

    #[test]
    fn templates_build_records_without_ids() {
        for kind in SectionKind::ALL {
            for spec in kind.schema().fields {
                if let FieldKind::List { templates, .. } = spec.kind {
                    for template in templates {
                        assert!(!(template.build)().contains_key("id"), "{}", template.label);
                    }
                }
            }
        }
    }
}
