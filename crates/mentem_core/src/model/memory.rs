//! Memory domain model.
//!
//! # Responsibility
//! - Define the captured-content record shared by all memory kinds.
//! - Keep the kind-specific payload in one tagged union.
//!
//! # Invariants
//! - `id` is unique within the memory collection and never reused.
//! - `kind` is fixed at creation; it is derived from the payload variant.
//! - `tag_ids` keeps caller order and may contain duplicates.

use crate::model::{new_record_id, now_epoch_ms};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque memory identifier. Also the record file stem.
pub type MemoryId = String;

/// Discriminator for memory payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Note,
    Image,
    Quote,
    Article,
    Product,
}

impl MemoryKind {
    /// Wire name written to the `kind` front-matter key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Image => "image",
            Self::Quote => "quote",
            Self::Article => "article",
            Self::Product => "product",
        }
    }

    /// Parses a wire name. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "note" => Some(Self::Note),
            "image" => Some(Self::Image),
            "quote" => Some(Self::Quote),
            "article" => Some(Self::Article),
            "product" => Some(Self::Product),
            _ => None,
        }
    }
}

impl Display for MemoryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific content of a memory.
///
/// Serialized with a `kind` tag so legacy camelCase JSON decodes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemoryPayload {
    /// Free text written by the user.
    Note { content: String },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
        #[serde(
            rename = "sourceUrl",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        source_url: Option<String>,
    },
    Article {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        excerpt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    Product {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
    },
}

impl MemoryPayload {
    pub fn kind(&self) -> MemoryKind {
        match self {
            Self::Note { .. } => MemoryKind::Note,
            Self::Image { .. } => MemoryKind::Image,
            Self::Quote { .. } => MemoryKind::Quote,
            Self::Article { .. } => MemoryKind::Article,
            Self::Product { .. } => MemoryKind::Product,
        }
    }
}

/// One captured piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: MemoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short user-written summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tldr: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(flatten)]
    pub payload: MemoryPayload,
}

impl Memory {
    /// Creates a memory with a caller-provided id and both timestamps set to
    /// `now_ms`.
    pub fn with_id(id: impl Into<MemoryId>, payload: MemoryPayload, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            title: None,
            tldr: None,
            created_at: now_ms,
            updated_at: now_ms,
            tag_ids: Vec::new(),
            payload,
        }
    }

    /// Creates a memory with a generated id, stamped with the current time.
    pub fn new(payload: MemoryPayload) -> Self {
        Self::with_id(new_record_id(), payload, now_epoch_ms())
    }

    /// Creates a note memory with a generated id.
    pub fn note(content: impl Into<String>) -> Self {
        Self::new(MemoryPayload::Note {
            content: content.into(),
        })
    }

    pub fn kind(&self) -> MemoryKind {
        self.payload.kind()
    }

    /// Returns the note body, if this memory is a note.
    pub fn content(&self) -> Option<&str> {
        match &self.payload {
            MemoryPayload::Note { content } => Some(content.as_str()),
            _ => None,
        }
    }

    /// Returns `true` when `tag_id` is referenced at least once.
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tag_ids.iter().any(|current| current == tag_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, MemoryKind, MemoryPayload};

    #[test]
    fn kind_wire_names_round_trip() {
        for kind in [
            MemoryKind::Note,
            MemoryKind::Image,
            MemoryKind::Quote,
            MemoryKind::Article,
            MemoryKind::Product,
        ] {
            assert_eq!(MemoryKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MemoryKind::parse("Note"), None);
        assert_eq!(MemoryKind::parse("video"), None);
    }

    #[test]
    fn note_constructor_sets_defaults() {
        let memory = Memory::note("hello");

        assert!(!memory.id.is_empty());
        assert_eq!(memory.kind(), MemoryKind::Note);
        assert_eq!(memory.content(), Some("hello"));
        assert_eq!(memory.created_at, memory.updated_at);
        assert!(memory.tag_ids.is_empty());
        assert_eq!(memory.title, None);
    }

    #[test]
    fn payload_reports_its_kind() {
        let quote = MemoryPayload::Quote {
            text: "Carpe diem".to_string(),
            author: None,
            source_url: None,
        };
        assert_eq!(quote.kind(), MemoryKind::Quote);
    }
}
