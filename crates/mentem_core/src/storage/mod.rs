//! Persistence boundary for record files.
//!
//! # Responsibility
//! - Define the async file-access contract used by stores and hydration.
//! - Provide a filesystem backend (`fs`) and an in-process backend
//!   (`in_memory`) with the same semantics.
//!
//! # Invariants
//! - One directory per collection, one `<id>.md` file per entity.
//! - `read_text`/`delete` on a missing entry return `StorageError::NotFound`.
//! - Entry names are single path components; anything else is refused with
//!   `StorageError::InvalidName` before a backend touches it.
//! - Backends never retry; callers decide what a failure means.

pub mod fs;
pub mod in_memory;

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub use fs::FsStorage;
pub use in_memory::InMemoryStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Entity collections persisted as separate directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Memories,
    Cards,
    Tags,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Memories, Collection::Cards, Collection::Tags];

    /// Directory name under the records root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Memories => "memories",
            Self::Cards => "cards",
            Self::Tags => "tags",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Handle to an ensured collection directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDir {
    collection: Collection,
    path: PathBuf,
}

impl CollectionDir {
    pub fn new(collection: Collection, path: impl Into<PathBuf>) -> Self {
        Self {
            collection,
            path: path.into(),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Storage-layer error.
#[derive(Debug)]
pub enum StorageError {
    NotFound {
        collection: Collection,
        name: String,
    },
    /// Name would resolve outside the collection directory.
    InvalidName {
        collection: Collection,
        name: String,
    },
    Io {
        collection: Collection,
        name: String,
        source: std::io::Error,
    },
}

impl StorageError {
    /// Maps an io error, folding `NotFound` into the semantic variant.
    pub fn from_io(collection: Collection, name: impl Into<String>, source: std::io::Error) -> Self {
        let name = name.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { collection, name }
        } else {
            Self::Io {
                collection,
                name,
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { collection, name } => {
                write!(f, "record not found: {collection}/{name}")
            }
            Self::InvalidName { collection, name } => {
                write!(f, "entry name {name:?} is not a plain file name in {collection}")
            }
            Self::Io {
                collection,
                name,
                source,
            } => write!(f, "io error on {collection}/{name}: {source}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } | Self::InvalidName { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Rejects names that are not exactly one path component.
pub fn check_entry_name(collection: Collection, name: &str) -> StorageResult<()> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|ch: char| matches!(ch, '/' | '\\' | '\0'));
    if plain {
        Ok(())
    } else {
        Err(StorageError::InvalidName {
            collection,
            name: name.to_string(),
        })
    }
}

/// Async file-access contract for record collections.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Creates the collection directory if needed and returns its handle.
    async fn ensure_collection(&self, collection: Collection) -> StorageResult<CollectionDir>;
    /// Lists entry names (not paths) in a collection directory.
    async fn list_entries(&self, dir: &CollectionDir) -> StorageResult<Vec<String>>;
    async fn read_text(&self, dir: &CollectionDir, name: &str) -> StorageResult<String>;
    /// Creates or overwrites one entry.
    async fn write_text(&self, dir: &CollectionDir, name: &str, content: &str)
        -> StorageResult<()>;
    async fn delete(&self, dir: &CollectionDir, name: &str) -> StorageResult<()>;
    async fn exists(&self, dir: &CollectionDir, name: &str) -> StorageResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::{check_entry_name, Collection, StorageError};

    #[test]
    fn entry_names_must_stay_inside_the_collection() {
        assert!(check_entry_name(Collection::Memories, "m1.md").is_ok());
        for name in ["", ".", "..", "../m1.md", "sub/m1.md", "a\\b.md", "nul\0.md"] {
            let err = check_entry_name(Collection::Memories, name).unwrap_err();
            assert!(matches!(err, StorageError::InvalidName { .. }), "{name:?}");
            assert!(!err.is_not_found());
        }
    }
}
