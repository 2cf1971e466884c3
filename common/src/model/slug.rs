//! Slug helpers used for section identifiers and page paths.

use std::sync::LazyLock;

use regex::Regex;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid color regex")
});

/// Lowercase letters and digits separated by single hyphens (`spring-sale-2024`).
pub fn is_valid_slug(s: &str) -> bool {
    SLUG_RE.is_match(s)
}

/// Builds a slug from free text: lowercases, drops anything that is not
/// alphanumeric, whitespace or `-`, and joins words with single hyphens.
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Prefixes a component slug with the site's base slug, trimming stray slashes.
pub fn join_slug(base: &str, component: &str) -> String {
    let component = component.trim_matches('/');
    let base = base.trim_matches('/');
    if base.is_empty() {
        return component.to_string();
    }
    if component.is_empty() {
        return base.to_string();
    }
    format!("{base}/{component}")
}

pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("main-footer"));
        assert!(is_valid_slug("a1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Main-Footer"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
    }

    #[test]
    fn slugify_collapses_separators_and_drops_symbols() {
        assert_eq!(slugify("Spring Sale Campaign 2024!"), "spring-sale-campaign-2024");
        assert_eq!(slugify("  Acme -- Store "), "acme-store");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn join_slug_handles_missing_parts() {
        assert_eq!(join_slug("acme", "footer"), "acme/footer");
        assert_eq!(join_slug("/acme/", "/footer/"), "acme/footer");
        assert_eq!(join_slug("", "footer"), "footer");
        assert_eq!(join_slug("acme", ""), "acme");
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#1976d2"));
        assert!(is_hex_color("#FFF"));
        assert!(!is_hex_color("1976d2"));
        assert!(!is_hex_color("#12345"));
    }
}
