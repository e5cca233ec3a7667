//! Legacy key-value store backed by SQLite.
//!
//! # Responsibility
//! - Open the pre-file-storage key-value database and keep its schema known.
//! - Expose get/set of string blobs through the `KeyValueStore` contract.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Nothing reads from the store before migrations succeed.
//! - A file written by a newer build is refused as a whole; it is never
//!   partially read.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod migrations;
mod open;

pub use kv::{KeyValueStore, SqliteKeyValueStore};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or querying the legacy store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused an open, a pragma, a schema step or a blob query.
    Sqlite(rusqlite::Error),
    /// The file carries a `user_version` this build has no steps for.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "legacy key-value store: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "legacy key-value store is at schema {found}, newer than the {supported} this build reads"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
