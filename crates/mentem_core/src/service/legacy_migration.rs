//! One-time replay of the legacy key-value store into record files.
//!
//! # Responsibility
//! - Read each collection's legacy blob, decode its entities and replay them
//!   through the normal store `add` path so every entity gets a file.
//! - Set the migration flag once the attempt has run, whatever its outcome.
//!
//! # Invariants
//! - Runs at most once per flag: a set flag short-circuits everything.
//! - Failures are logged and counted, never returned.
//! - Entities whose id is not a plain file name are skipped and counted as
//!   failures; they never reach a store.
//! - Entities are not checked against already hydrated ids; an entity present
//!   both on disk and in the legacy blob ends up twice in memory.

use crate::config::{
    LEGACY_CARDS_KEY, LEGACY_MEMORIES_KEY, LEGACY_TAGS_KEY, MIGRATION_FLAG_DONE,
    MIGRATION_FLAG_KEY,
};
use crate::db::{DbError, KeyValueStore};
use crate::model::card::Card;
use crate::model::memory::Memory;
use crate::model::tag::Tag;
use crate::record::is_valid_record_id;
use crate::store::Library;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while reading one legacy blob.
#[derive(Debug)]
pub enum MigrationError {
    Db(DbError),
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
    /// Blob is valid JSON but not an object (or envelope around one).
    UnexpectedShape { key: &'static str },
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode { key, source } => write!(f, "legacy blob `{key}` is not JSON: {source}"),
            Self::UnexpectedShape { key } => {
                write!(f, "legacy blob `{key}` is not a state object")
            }
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
            Self::UnexpectedShape { .. } => None,
        }
    }
}

impl From<DbError> for MigrationError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Counts from one migration attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub memories: usize,
    pub cards: usize,
    pub tags: usize,
    /// Blobs that could not be read plus entities that could not be decoded
    /// or addressed.
    pub failures: usize,
    pub flag_saved: bool,
}

/// Result of `migrate_legacy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The flag was already set; nothing was read.
    AlreadyMigrated,
    /// The flag could not be read; nothing was replayed and the flag is left
    /// untouched so a later start can try again.
    FlagUnavailable,
    Attempted(MigrationReport),
}

/// Replays legacy entities into `library` unless the flag says it already
/// happened.
pub fn migrate_legacy(library: &Library, kv: &dyn KeyValueStore) -> MigrationOutcome {
    match kv.get(MIGRATION_FLAG_KEY) {
        Ok(Some(flag)) if flag == MIGRATION_FLAG_DONE => {
            return MigrationOutcome::AlreadyMigrated;
        }
        Ok(_) => {}
        Err(err) => {
            warn!(
                "event=legacy_migrate module=service status=error stage=read_flag error={}",
                err
            );
            return MigrationOutcome::FlagUnavailable;
        }
    }

    let mut report = MigrationReport::default();

    let memories: Vec<Memory> = read_entities(kv, LEGACY_MEMORIES_KEY, "memories", &mut report);
    for memory in memories {
        if !addressable(LEGACY_MEMORIES_KEY, &memory.id, &mut report) {
            continue;
        }
        library.memories.add(memory);
        report.memories += 1;
    }

    let cards: Vec<Card> = read_entities(kv, LEGACY_CARDS_KEY, "cards", &mut report);
    for card in cards {
        if !addressable(LEGACY_CARDS_KEY, &card.id, &mut report) {
            continue;
        }
        library.cards.add(card);
        report.cards += 1;
    }

    let tags: Vec<Tag> = read_entities(kv, LEGACY_TAGS_KEY, "tags", &mut report);
    for tag in tags {
        if !addressable(LEGACY_TAGS_KEY, &tag.id, &mut report) {
            continue;
        }
        library.tags.add(tag);
        report.tags += 1;
    }

    report.flag_saved = match kv.set(MIGRATION_FLAG_KEY, MIGRATION_FLAG_DONE) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "event=legacy_migrate module=service status=error stage=write_flag error={}",
                err
            );
            false
        }
    };

    info!(
        "event=legacy_migrate module=service status=ok memories={} cards={} tags={} failures={}",
        report.memories, report.cards, report.tags, report.failures
    );
    MigrationOutcome::Attempted(report)
}

/// Decodes the entity list stored under `field` in the blob at `key`.
///
/// Accepts both `{ field: [...] }` and `{ state: { field: [...] } }`.
/// Missing blobs and missing fields yield an empty list.
pub fn load_legacy_entities<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &'static str,
    field: &str,
) -> Result<(Vec<T>, usize), MigrationError> {
    let Some(raw) = kv.get(key)? else {
        return Ok((Vec::new(), 0));
    };
    let blob: Value =
        serde_json::from_str(&raw).map_err(|source| MigrationError::Decode { key, source })?;

    let state = blob
        .get("state")
        .filter(|inner| inner.is_object())
        .unwrap_or(&blob);
    let Some(state) = state.as_object() else {
        return Err(MigrationError::UnexpectedShape { key });
    };

    let Some(items) = state.get(field).and_then(Value::as_array) else {
        return Ok((Vec::new(), 0));
    };

    let mut entities = Vec::with_capacity(items.len());
    let mut rejected = 0;
    for item in items {
        match T::deserialize(item) {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                warn!(
                    "event=legacy_entity module=service status=skipped key={} error={}",
                    key, err
                );
                rejected += 1;
            }
        }
    }
    Ok((entities, rejected))
}

fn read_entities<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &'static str,
    field: &str,
    report: &mut MigrationReport,
) -> Vec<T> {
    match load_legacy_entities(kv, key, field) {
        Ok((entities, rejected)) => {
            report.failures += rejected;
            entities
        }
        Err(err) => {
            warn!(
                "event=legacy_migrate module=service status=error key={} error={}",
                key, err
            );
            report.failures += 1;
            Vec::new()
        }
    }
}

fn addressable(key: &'static str, id: &str, report: &mut MigrationReport) -> bool {
    if is_valid_record_id(id) {
        return true;
    }
    warn!(
        "event=legacy_entity module=service status=skipped key={} id={:?} reason=invalid_id",
        key, id
    );
    report.failures += 1;
    false
}
