//! In-process record storage.
//!
//! Mirrors `FsStorage` semantics without touching the disk. Write failures
//! can be switched on to exercise the error paths of callers.

use super::{
    check_entry_name, Collection, CollectionDir, RecordStorage, StorageError, StorageResult,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    dirs: BTreeSet<Collection>,
    files: BTreeMap<(Collection, String), String>,
}

/// Record storage kept in a process-local map.
#[derive(Default)]
pub struct InMemoryStorage {
    inner: Mutex<Inner>,
    fail_writes: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `write_text` and `delete` fail with an io error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Places raw text directly, bypassing failure injection.
    pub fn insert_raw(&self, collection: Collection, name: impl Into<String>, content: impl Into<String>) {
        let mut inner = self.lock();
        inner.dirs.insert(collection);
        inner
            .files
            .insert((collection, name.into()), content.into());
    }

    /// Returns raw text of one entry, if present.
    pub fn get_raw(&self, collection: Collection, name: &str) -> Option<String> {
        self.lock()
            .files
            .get(&(collection, name.to_string()))
            .cloned()
    }

    /// Returns sorted entry names in one collection.
    pub fn names(&self, collection: Collection) -> Vec<String> {
        self.lock()
            .files
            .keys()
            .filter(|(current, _)| *current == collection)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self, collection: Collection, name: &str) -> StorageResult<()> {
        check_entry_name(collection, name)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                collection,
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "write failure injected"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStorage for InMemoryStorage {
    async fn ensure_collection(&self, collection: Collection) -> StorageResult<CollectionDir> {
        self.lock().dirs.insert(collection);
        Ok(CollectionDir::new(collection, collection.dir_name()))
    }

    async fn list_entries(&self, dir: &CollectionDir) -> StorageResult<Vec<String>> {
        Ok(self.names(dir.collection()))
    }

    async fn read_text(&self, dir: &CollectionDir, name: &str) -> StorageResult<String> {
        self.get_raw(dir.collection(), name)
            .ok_or_else(|| StorageError::NotFound {
                collection: dir.collection(),
                name: name.to_string(),
            })
    }

    async fn write_text(
        &self,
        dir: &CollectionDir,
        name: &str,
        content: &str,
    ) -> StorageResult<()> {
        self.check_writable(dir.collection(), name)?;
        self.lock()
            .files
            .insert((dir.collection(), name.to_string()), content.to_string());
        Ok(())
    }

    async fn delete(&self, dir: &CollectionDir, name: &str) -> StorageResult<()> {
        self.check_writable(dir.collection(), name)?;
        match self
            .lock()
            .files
            .remove(&(dir.collection(), name.to_string()))
        {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound {
                collection: dir.collection(),
                name: name.to_string(),
            }),
        }
    }

    async fn exists(&self, dir: &CollectionDir, name: &str) -> StorageResult<bool> {
        Ok(self
            .lock()
            .files
            .contains_key(&(dir.collection(), name.to_string())))
    }
}
