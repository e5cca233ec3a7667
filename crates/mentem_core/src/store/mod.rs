//! Collection stores: authoritative in-memory state plus write-behind files.
//!
//! # Responsibility
//! - Hold one store per entity kind and apply mutations synchronously.
//! - Hand each mutation's record to the `Persister` as a background task.
//!
//! # Invariants
//! - Mutations return immediately; persistence failures go to the injected
//!   `ErrorSink` and never roll back in-memory state.
//! - `hydrate` replaces a collection and never writes to storage.
//! - A single `Library` is built at process start and passed to consumers;
//!   there are no global stores.

pub mod card_store;
pub mod library;
pub mod memory_store;
pub mod persister;
pub mod tag_store;

pub use card_store::CardStore;
pub use library::Library;
pub use memory_store::MemoryStore;
pub use persister::{
    ErrorSink, LoggingErrorSink, PersistFailure, PersistOp, PersistTask, Persister,
};
pub use tag_store::TagStore;
