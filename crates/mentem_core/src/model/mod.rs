//! Domain model for captured memories, flashcards and tags.
//!
//! # Responsibility
//! - Define canonical data structures shared by codecs, stores and migration.
//! - Provide id and clock helpers used when new entities are created.
//!
//! # Invariants
//! - Every entity is identified by an opaque string id, unique per collection.
//! - Entities are replaced whole on every change, never patched in place.

pub mod card;
pub mod memory;
pub mod tag;

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generates a new opaque record id (32 lowercase hex chars).
///
/// The simple uuid form contains no characters that need quoting in front
/// matter and is safe as a file stem.
pub fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
