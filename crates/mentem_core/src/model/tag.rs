//! Tag domain model and color palette.
//!
//! # Invariants
//! - `id` is unique within the tag collection.
//! - `name` keeps the user's casing; uniqueness of names is not enforced.
//! - `color` is always one of the fixed palette entries.

use crate::model::new_record_id;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque tag identifier. Also the record file stem.
pub type TagId = String;

/// Fixed tag palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Primary,
    Secondary,
    Success,
    Warning,
    Danger,
    /// Also the fallback for unknown persisted values.
    #[default]
    #[serde(other)]
    Default,
}

impl TagColor {
    pub const ALL: [TagColor; 6] = [
        TagColor::Default,
        TagColor::Primary,
        TagColor::Secondary,
        TagColor::Success,
        TagColor::Warning,
        TagColor::Danger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Parses a palette name, falling back to [`TagColor::Default`].
    pub fn parse_lossy(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == value)
            .unwrap_or_default()
    }

    /// Picks a palette entry at random.
    pub fn random() -> Self {
        let byte = Uuid::new_v4().as_bytes()[0];
        Self::ALL[usize::from(byte) % Self::ALL.len()]
    }
}

impl Display for TagColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-defined label attached to memories and cards by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub color: TagColor,
}

impl Tag {
    /// Creates a tag with a generated id.
    pub fn new(name: impl Into<String>, color: TagColor) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            color,
        }
    }

    /// Case-insensitive name comparison used by lookups.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::{Tag, TagColor};

    #[test]
    fn unknown_colors_fall_back_to_default() {
        assert_eq!(TagColor::parse_lossy("danger"), TagColor::Danger);
        assert_eq!(TagColor::parse_lossy("DANGER"), TagColor::Default);
        assert_eq!(TagColor::parse_lossy("teal"), TagColor::Default);
    }

    #[test]
    fn random_color_is_in_palette() {
        for _ in 0..32 {
            assert!(TagColor::ALL.contains(&TagColor::random()));
        }
    }

    #[test]
    fn name_matching_ignores_case() {
        let tag = Tag::new("Work", TagColor::Primary);
        assert!(tag.name_matches("work"));
        assert!(tag.name_matches("WORK"));
        assert!(!tag.name_matches("works"));
    }
}
