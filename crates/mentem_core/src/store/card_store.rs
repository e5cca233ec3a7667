//! In-memory flashcard collection with write-behind persistence.
//!
//! # Invariants
//! - Same mutation contract as `MemoryStore`; cards have no delete path.

use crate::model::card::Card;
use crate::record::card::card_to_markdown;
use crate::storage::Collection;
use crate::store::persister::{PersistTask, Persister};
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the card collection. Clones share state.
#[derive(Clone)]
pub struct CardStore {
    cards: Arc<Mutex<Vec<Card>>>,
    persister: Persister,
}

impl CardStore {
    pub fn new(persister: Persister) -> Self {
        Self {
            cards: Arc::new(Mutex::new(Vec::new())),
            persister,
        }
    }

    pub fn list(&self) -> Vec<Card> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<Card> {
        self.lock().iter().find(|card| card.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Appends a card and schedules its record write.
    pub fn add(&self, card: Card) -> PersistTask {
        let content = card_to_markdown(&card);
        let id = card.id.clone();
        self.lock().push(card);
        self.persister.write(Collection::Cards, &id, content)
    }

    /// Replaces the card `id` with `transform(current)`; the id is fixed.
    pub fn update<F>(&self, id: &str, transform: F) -> Option<PersistTask>
    where
        F: FnOnce(&Card) -> Card,
    {
        let content = {
            let mut cards = self.lock();
            let slot = cards.iter_mut().find(|card| card.id == id)?;
            let next = transform(slot);
            if next.id != slot.id {
                warn!(
                    "event=card_update module=store status=rejected id={} reason=identity_changed",
                    id
                );
                return None;
            }
            *slot = next;
            card_to_markdown(slot)
        };
        Some(self.persister.write(Collection::Cards, id, content))
    }

    pub fn add_tags(&self, id: &str, tag_ids: &[String]) -> Option<PersistTask> {
        self.update(id, |current| {
            let mut next = current.clone();
            next.tag_ids.extend(tag_ids.iter().cloned());
            next
        })
    }

    pub fn remove_tags(&self, id: &str, tag_ids: &[String]) -> Option<PersistTask> {
        self.update(id, |current| {
            let mut next = current.clone();
            next.tag_ids.retain(|tag_id| !tag_ids.contains(tag_id));
            next
        })
    }

    /// Replaces the whole collection without touching storage.
    pub fn hydrate(&self, cards: Vec<Card>) {
        *self.lock() = cards;
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Card>> {
        self.cards
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
