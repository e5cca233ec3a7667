//! Startup hydration of collection stores from record files.
//!
//! # Responsibility
//! - List each collection directory, parse every `*.md` entry and replace the
//!   matching store's contents via `hydrate`.
//!
//! # Invariants
//! - An unreadable or unparseable record is skipped and counted; it never
//!   stops the rest of the directory from loading.
//! - A collection whose directory cannot be listed hydrates as empty.
//! - Hydration never schedules writes.
//! - Entries are processed in file-name order.

use crate::model::card::Card;
use crate::model::memory::Memory;
use crate::model::tag::Tag;
use crate::record::card::parse_card_markdown;
use crate::record::memory::parse_memory_markdown;
use crate::record::tag::parse_tag_markdown;
use crate::record::{record_id_from_file_name, RecordParseResult};
use crate::storage::{Collection, RecordStorage};
use crate::store::Library;
use log::{info, warn};

/// Records recovered from one collection directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCollection<T> {
    pub records: Vec<T>,
    /// Entries that looked like records but could not be read or parsed.
    pub skipped: usize,
}

impl<T> Default for LoadedCollection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Per-collection counts after hydration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub memories: usize,
    pub cards: usize,
    pub tags: usize,
    pub skipped: usize,
}

/// Loads all three collections from the library's storage and hydrates the
/// stores with them.
pub async fn hydrate_library(library: &Library) -> HydrationReport {
    let storage = library.persister().storage().as_ref();

    let memories: LoadedCollection<Memory> =
        load_collection(storage, Collection::Memories, parse_memory_markdown).await;
    let cards: LoadedCollection<Card> =
        load_collection(storage, Collection::Cards, parse_card_markdown).await;
    let tags: LoadedCollection<Tag> =
        load_collection(storage, Collection::Tags, parse_tag_markdown).await;

    let report = HydrationReport {
        memories: memories.records.len(),
        cards: cards.records.len(),
        tags: tags.records.len(),
        skipped: memories.skipped + cards.skipped + tags.skipped,
    };

    library.memories.hydrate(memories.records);
    library.cards.hydrate(cards.records);
    library.tags.hydrate(tags.records);

    info!(
        "event=hydrate module=service status=ok memories={} cards={} tags={} skipped={}",
        report.memories, report.cards, report.tags, report.skipped
    );
    report
}

/// Reads and parses every record file of one collection.
pub async fn load_collection<T>(
    storage: &dyn RecordStorage,
    collection: Collection,
    parse: fn(&str) -> RecordParseResult<T>,
) -> LoadedCollection<T> {
    let mut loaded = LoadedCollection::default();

    let dir = match storage.ensure_collection(collection).await {
        Ok(dir) => dir,
        Err(err) => {
            warn!(
                "event=hydrate module=service status=error collection={} stage=ensure_dir error={}",
                collection, err
            );
            return loaded;
        }
    };
    let mut names = match storage.list_entries(&dir).await {
        Ok(names) => names,
        Err(err) => {
            warn!(
                "event=hydrate module=service status=error collection={} stage=list error={}",
                collection, err
            );
            return loaded;
        }
    };
    names.sort();

    for name in names {
        if record_id_from_file_name(&name).is_none() {
            continue;
        }
        let text = match storage.read_text(&dir, &name).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "event=hydrate_record module=service status=skipped collection={} file={} error={}",
                    collection, name, err
                );
                loaded.skipped += 1;
                continue;
            }
        };
        match parse(&text) {
            Ok(record) => loaded.records.push(record),
            Err(err) => {
                warn!(
                    "event=hydrate_record module=service status=skipped collection={} file={} error={}",
                    collection, name, err
                );
                loaded.skipped += 1;
            }
        }
    }

    loaded
}
