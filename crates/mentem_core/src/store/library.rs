//! Process-wide set of collection stores.

use crate::store::card_store::CardStore;
use crate::store::memory_store::MemoryStore;
use crate::store::persister::Persister;
use crate::store::tag_store::TagStore;

/// The three collection stores sharing one persister.
///
/// Built once at startup and passed by reference (or cloned; clones share
/// state) to every consumer.
#[derive(Clone)]
pub struct Library {
    pub memories: MemoryStore,
    pub cards: CardStore,
    pub tags: TagStore,
    persister: Persister,
}

impl Library {
    pub fn new(persister: Persister) -> Self {
        Self {
            memories: MemoryStore::new(persister.clone()),
            cards: CardStore::new(persister.clone()),
            tags: TagStore::new(persister.clone()),
            persister,
        }
    }

    pub fn persister(&self) -> &Persister {
        &self.persister
    }

    /// Waits for all pending background writes and deletes.
    pub async fn settle(&self) {
        self.persister.settle().await;
    }
}
