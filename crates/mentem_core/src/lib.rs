//! Core persistence for mentem.
//! Memories, cards and tags live in memory and are mirrored to one markdown
//! record file per entity.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod record;
pub mod service;
pub mod storage;
pub mod store;

pub use codec::{
    decode_front_matter, decode_scalar, encode_front_matter, encode_scalar, FrontMatter,
    FrontMatterValue, Scalar,
};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::card::{Card, CardId};
pub use model::memory::{Memory, MemoryId, MemoryKind, MemoryPayload};
pub use model::tag::{Tag, TagColor, TagId};
pub use record::card::{card_to_markdown, parse_card_markdown};
pub use record::memory::{memory_to_markdown, parse_memory_markdown};
pub use record::tag::{parse_tag_markdown, tag_to_markdown};
pub use record::{is_valid_record_id, RecordParseError, RecordParseResult};
pub use service::{
    hydrate_library, migrate_legacy, startup, HydrationReport, MigrationOutcome, MigrationReport,
    StartupReport,
};
pub use storage::{Collection, FsStorage, InMemoryStorage, RecordStorage, StorageError};
pub use store::{
    CardStore, ErrorSink, Library, LoggingErrorSink, MemoryStore, PersistFailure, PersistOp,
    PersistTask, Persister, TagStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
