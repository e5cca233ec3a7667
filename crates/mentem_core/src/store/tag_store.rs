//! In-memory tag collection with write-behind persistence.
//!
//! # Invariants
//! - Same mutation contract as `MemoryStore`; tags have no delete path.
//! - Name lookups are case-insensitive and return the first match in
//!   insertion order.

use crate::model::tag::{Tag, TagColor};
use crate::record::tag::tag_to_markdown;
use crate::storage::Collection;
use crate::store::persister::{PersistTask, Persister};
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the tag collection. Clones share state.
#[derive(Clone)]
pub struct TagStore {
    tags: Arc<Mutex<Vec<Tag>>>,
    persister: Persister,
}

impl TagStore {
    pub fn new(persister: Persister) -> Self {
        Self {
            tags: Arc::new(Mutex::new(Vec::new())),
            persister,
        }
    }

    pub fn list(&self) -> Vec<Tag> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<Tag> {
        self.lock().iter().find(|tag| tag.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// First tag whose name equals `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<Tag> {
        self.lock().iter().find(|tag| tag.name_matches(name)).cloned()
    }

    /// Appends an existing tag value and schedules its record write.
    pub fn add(&self, tag: Tag) -> PersistTask {
        let content = tag_to_markdown(&tag);
        let id = tag.id.clone();
        self.lock().push(tag);
        self.persister.write(Collection::Tags, &id, content)
    }

    /// Creates a tag with a new id; a random palette color is used when
    /// `color` is `None`.
    pub fn add_tag(&self, name: impl Into<String>, color: Option<TagColor>) -> (Tag, PersistTask) {
        let tag = Tag::new(name, color.unwrap_or_else(TagColor::random));
        let task = self.add(tag.clone());
        (tag, task)
    }

    /// Returns the tag named `name` (trimmed, case-insensitive), creating it
    /// when missing. Blank names yield `None`.
    pub fn ensure_tag(&self, name: &str) -> Option<Tag> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(existing) = self.find_by_name(trimmed) {
            return Some(existing);
        }
        let (tag, _task) = self.add_tag(trimmed, None);
        Some(tag)
    }

    /// Replaces the tag `id` with `transform(current)`; the id is fixed.
    pub fn update<F>(&self, id: &str, transform: F) -> Option<PersistTask>
    where
        F: FnOnce(&Tag) -> Tag,
    {
        let content = {
            let mut tags = self.lock();
            let slot = tags.iter_mut().find(|tag| tag.id == id)?;
            let next = transform(slot);
            if next.id != slot.id {
                warn!(
                    "event=tag_update module=store status=rejected id={} reason=identity_changed",
                    id
                );
                return None;
            }
            *slot = next;
            tag_to_markdown(slot)
        };
        Some(self.persister.write(Collection::Tags, id, content))
    }

    /// Replaces the whole collection without touching storage.
    pub fn hydrate(&self, tags: Vec<Tag>) {
        *self.lock() = tags;
    }

    /// Empties the collection without touching storage.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Tag>> {
        self.tags
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
