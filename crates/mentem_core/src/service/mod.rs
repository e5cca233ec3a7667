//! Startup use-cases over the collection stores.
//!
//! # Responsibility
//! - Load persisted records into the stores (`hydration`).
//! - Replay the legacy key-value store once (`legacy_migration`).
//! - Run both in the required order at process start (`startup`).
//!
//! # Invariants
//! - No function here returns an error to its caller; every failure degrades
//!   to missing data and is logged.

pub mod hydration;
pub mod legacy_migration;

pub use hydration::{hydrate_library, load_collection, HydrationReport, LoadedCollection};
pub use legacy_migration::{
    load_legacy_entities, migrate_legacy, MigrationError, MigrationOutcome, MigrationReport,
};

use crate::db::KeyValueStore;
use crate::store::Library;

/// Outcome of `startup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub hydration: HydrationReport,
    /// `None` when no legacy store was supplied.
    pub migration: Option<MigrationOutcome>,
}

/// Hydrates every store from disk, then runs the one-time legacy migration.
///
/// Hydration completes before migration starts, so migrated entities are
/// appended after the on-disk ones. Callers should not mutate the stores
/// until this returns.
pub async fn startup(library: &Library, legacy: Option<&dyn KeyValueStore>) -> StartupReport {
    let hydration = hydrate_library(library).await;
    let migration = legacy.map(|kv| migrate_legacy(library, kv));
    StartupReport {
        hydration,
        migration,
    }
}
