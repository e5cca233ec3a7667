//! Filesystem-backed record storage.
//!
//! # Invariants
//! - All paths stay under `root/<collection>/`: entry names go through
//!   `check_entry_name` before they are joined.
//! - Writes replace the whole file.

use super::{
    check_entry_name, Collection, CollectionDir, RecordStorage, StorageError, StorageResult,
};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

/// Record storage rooted at one directory on disk.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn entry_path(dir: &CollectionDir, name: &str) -> StorageResult<PathBuf> {
    check_entry_name(dir.collection(), name)?;
    Ok(dir.path().join(name))
}

#[async_trait]
impl RecordStorage for FsStorage {
    async fn ensure_collection(&self, collection: Collection) -> StorageResult<CollectionDir> {
        let path = self.root.join(collection.dir_name());
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|err| StorageError::from_io(collection, "", err))?;
        debug!(
            "event=collection_ready module=storage status=ok collection={}",
            collection
        );
        Ok(CollectionDir::new(collection, path))
    }

    async fn list_entries(&self, dir: &CollectionDir) -> StorageResult<Vec<String>> {
        let collection = dir.collection();
        let mut entries = tokio::fs::read_dir(dir.path())
            .await
            .map_err(|err| StorageError::from_io(collection, "", err))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| StorageError::from_io(collection, "", err))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn read_text(&self, dir: &CollectionDir, name: &str) -> StorageResult<String> {
        tokio::fs::read_to_string(entry_path(dir, name)?)
            .await
            .map_err(|err| StorageError::from_io(dir.collection(), name, err))
    }

    async fn write_text(
        &self,
        dir: &CollectionDir,
        name: &str,
        content: &str,
    ) -> StorageResult<()> {
        tokio::fs::write(entry_path(dir, name)?, content)
            .await
            .map_err(|err| StorageError::from_io(dir.collection(), name, err))
    }

    async fn delete(&self, dir: &CollectionDir, name: &str) -> StorageResult<()> {
        tokio::fs::remove_file(entry_path(dir, name)?)
            .await
            .map_err(|err| StorageError::from_io(dir.collection(), name, err))
    }

    async fn exists(&self, dir: &CollectionDir, name: &str) -> StorageResult<bool> {
        tokio::fs::try_exists(entry_path(dir, name)?)
            .await
            .map_err(|err| StorageError::from_io(dir.collection(), name, err))
    }
}
