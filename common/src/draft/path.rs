//! Field paths address a value inside a draft's `fields` object.
//!
//! ```text
//! title                       top-level key
//! size.width                  nested key
//! columns[3].links[1].label   list positions
//! slides[#4f1c…].image        list item selected by its `id`
//! components[*].config.src    every item of a list (schema patterns only)
//! ```
//!
//! Item ids may not contain `.` or `]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::PathError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
    Id(String),
    Wildcard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        let malformed = || PathError::Malformed(input.to_string());

        let mut segments = Vec::new();
        for part in input.split('.') {
            let (name, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if name.is_empty() || name.contains(']') {
                return Err(malformed());
            }
            segments.push(Segment::Key(name.to_string()));

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(malformed)?;
                let selector = rest.get(1..close).ok_or_else(malformed)?;
                segments.push(parse_selector(selector).ok_or_else(malformed)?);
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(malformed());
                }
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `segment` appended.
    pub fn join(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn key(&self, name: &str) -> Self {
        self.join(Segment::Key(name.to_string()))
    }

    pub fn item(&self, id: &str) -> Self {
        self.join(Segment::Id(id.to_string()))
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// True for schema patterns containing `[*]`.
    pub fn is_pattern(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Wildcard))
    }
}

fn parse_selector(selector: &str) -> Option<Segment> {
    if selector == "*" {
        return Some(Segment::Wildcard);
    }
    if let Some(id) = selector.strip_prefix('#') {
        return (!id.is_empty()).then(|| Segment::Id(id.to_string()));
    }
    selector.parse().ok().map(Segment::Index)
}

impl From<Vec<Segment>> for FieldPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Id(id) => write!(f, "[#{id}]")?,
                Segment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_keys_indices_and_ids() {
        let path = FieldPath::parse("columns[3].links[#abc].label").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("columns".into()),
                Segment::Index(3),
                Segment::Key("links".into()),
                Segment::Id("abc".into()),
                Segment::Key("label".into()),
            ]
        );
        assert_eq!(path.to_string(), "columns[3].links[#abc].label");
    }

    #[test]
    fn consecutive_selectors_are_allowed() {
        let path = FieldPath::parse("grid[1][2]").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "grid[1][2]");
    }

    #[test]
    fn wildcard_marks_a_pattern() {
        assert!(FieldPath::parse("slides[*].image").unwrap().is_pattern());
        assert!(!FieldPath::parse("slides[0].image").unwrap().is_pattern());
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", "  ", "a..b", "a[", "a[]", "a[x]", "a[#]", "a[1]b", ".a", "[0]"] {
            assert!(FieldPath::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn prefix_matching() {
        let item = FieldPath::parse("slides[#s1]").unwrap();
        assert!(FieldPath::parse("slides[#s1].image").unwrap().starts_with(&item));
        assert!(!FieldPath::parse("slides[#s2].image").unwrap().starts_with(&item));
    }
}
