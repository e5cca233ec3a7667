//! Flashcard domain model.
//!
//! # Invariants
//! - `id` is unique within the card collection.
//! - Cards are never deleted through this crate.

use crate::model::new_record_id;
use serde::{Deserialize, Serialize};

/// Opaque card identifier. Also the record file stem.
pub type CardId = String;

/// Two-sided flashcard, usually derived from a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub front_side: String,
    pub back_side: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

impl Card {
    /// Creates a card with a generated id and no tags.
    pub fn new(front_side: impl Into<String>, back_side: impl Into<String>) -> Self {
        Self::with_id(new_record_id(), front_side, back_side)
    }

    pub fn with_id(
        id: impl Into<CardId>,
        front_side: impl Into<String>,
        back_side: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            front_side: front_side.into(),
            back_side: back_side.into(),
            tag_ids: Vec::new(),
        }
    }
}
