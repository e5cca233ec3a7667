//! In-memory memory collection with write-behind persistence.
//!
//! # Responsibility
//! - Own the authoritative list of memories for the running session.
//! - Mirror every mutation to `memories/<id>.md` in the background.
//!
//! # Invariants
//! - The in-memory change is applied before the background task is spawned
//!   and is never rolled back.
//! - The record written for a mutation is serialized from the state right
//!   after that mutation.
//! - `id` and `kind` of a stored memory never change through `update`.

use crate::model::memory::Memory;
use crate::record::memory::memory_to_markdown;
use crate::storage::Collection;
use crate::store::persister::{PersistTask, Persister};
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the memory collection. Clones share state.
#[derive(Clone)]
pub struct MemoryStore {
    memories: Arc<Mutex<Vec<Memory>>>,
    persister: Persister,
}

impl MemoryStore {
    pub fn new(persister: Persister) -> Self {
        Self {
            memories: Arc::new(Mutex::new(Vec::new())),
            persister,
        }
    }

    /// Snapshot of the collection in insertion order.
    pub fn list(&self) -> Vec<Memory> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<Memory> {
        self.lock().iter().find(|memory| memory.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Appends a memory and schedules its record write.
    pub fn add(&self, memory: Memory) -> PersistTask {
        let content = memory_to_markdown(&memory);
        let id = memory.id.clone();
        self.lock().push(memory);
        self.persister.write(Collection::Memories, &id, content)
    }

    /// Replaces the memory `id` with `transform(current)`.
    ///
    /// Returns `None` without side effects when `id` is unknown, or when the
    /// transform tries to change the id or kind.
    pub fn update<F>(&self, id: &str, transform: F) -> Option<PersistTask>
    where
        F: FnOnce(&Memory) -> Memory,
    {
        let content = {
            let mut memories = self.lock();
            let slot = memories.iter_mut().find(|memory| memory.id == id)?;
            let next = transform(slot);
            if next.id != slot.id || next.kind() != slot.kind() {
                warn!(
                    "event=memory_update module=store status=rejected id={} reason=identity_changed",
                    id
                );
                return None;
            }
            *slot = next;
            memory_to_markdown(slot)
        };
        Some(self.persister.write(Collection::Memories, id, content))
    }

    /// Removes the memory `id` and schedules deletion of its record.
    ///
    /// The delete is scheduled even when `id` is not in memory, so stale
    /// files get cleaned up.
    pub fn remove(&self, id: &str) -> PersistTask {
        self.lock().retain(|memory| memory.id != id);
        self.persister.delete(Collection::Memories, id)
    }

    /// Appends `tag_ids` (duplicates allowed) to the memory's tag list.
    pub fn add_tags(&self, id: &str, tag_ids: &[String]) -> Option<PersistTask> {
        self.update(id, |current| {
            let mut next = current.clone();
            next.tag_ids.extend(tag_ids.iter().cloned());
            next
        })
    }

    /// Removes every occurrence of each id in `tag_ids`.
    pub fn remove_tags(&self, id: &str, tag_ids: &[String]) -> Option<PersistTask> {
        self.update(id, |current| {
            let mut next = current.clone();
            next.tag_ids.retain(|tag_id| !tag_ids.contains(tag_id));
            next
        })
    }

    /// Replaces the whole collection without touching storage.
    pub fn hydrate(&self, memories: Vec<Memory>) {
        *self.lock() = memories;
    }

    /// Empties the collection without touching storage.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Memory>> {
        self.memories
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
