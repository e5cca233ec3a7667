//! Background persistence for store mutations.
//!
//! # Responsibility
//! - Run record writes/deletes as detached tasks on a tokio runtime.
//! - Route every failure to an injected `ErrorSink`; nothing is returned to
//!   the mutating caller and nothing is retried.
//!
//! # Invariants
//! - Spawned tasks are tracked so `settle()` can wait for quiescence.
//! - An id that is not a plain file name never reaches storage; it is reported
//!   to the sink as `StorageError::InvalidName`.
//! - Task ordering is not guaranteed: the last write to complete wins.

use crate::record::record_file_name;
use crate::storage::{Collection, RecordStorage, StorageError};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

/// Handle to one background write or delete.
///
/// Dropping it detaches the task; awaiting it only waits, the outcome is
/// reported through the sink.
pub type PersistTask = JoinHandle<()>;

/// Kind of background operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Write,
    Delete,
}

impl Display for PersistOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write => f.write_str("write"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// One failed background operation.
#[derive(Debug)]
pub struct PersistFailure {
    pub collection: Collection,
    pub id: String,
    pub op: PersistOp,
    pub error: StorageError,
}

impl Display for PersistFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {}/{} failed: {}",
            self.op, self.collection, self.id, self.error
        )
    }
}

impl Error for PersistFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Receiver of background persistence failures.
pub trait ErrorSink: Send + Sync {
    fn report(&self, failure: PersistFailure);
}

/// Default sink: logs failures and drops them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorSink;

impl ErrorSink for LoggingErrorSink {
    fn report(&self, failure: PersistFailure) {
        error!(
            "event=record_{} module=store status=error collection={} id={} error={}",
            failure.op, failure.collection, failure.id, failure.error
        );
    }
}

/// Spawns and tracks background persistence tasks.
#[derive(Clone)]
pub struct Persister {
    storage: Arc<dyn RecordStorage>,
    sink: Arc<dyn ErrorSink>,
    runtime: Handle,
    tracker: TaskTracker,
}

impl Persister {
    pub fn new(storage: Arc<dyn RecordStorage>, sink: Arc<dyn ErrorSink>, runtime: Handle) -> Self {
        Self {
            storage,
            sink,
            runtime,
            tracker: TaskTracker::new(),
        }
    }

    /// Persister on the current runtime with the logging sink.
    ///
    /// # Panics
    /// - When called outside a tokio runtime.
    pub fn on_current_runtime(storage: Arc<dyn RecordStorage>) -> Self {
        Self::new(storage, Arc::new(LoggingErrorSink), Handle::current())
    }

    pub fn storage(&self) -> &Arc<dyn RecordStorage> {
        &self.storage
    }

    /// Schedules `<id>.md` to be created or overwritten with `content`.
    pub fn write(&self, collection: Collection, id: &str, content: String) -> PersistTask {
        let storage = Arc::clone(&self.storage);
        let sink = Arc::clone(&self.sink);
        let id = id.to_string();
        self.spawn(async move {
            let Some(name) = record_file_name(&id) else {
                sink.report(rejected_id(collection, id, PersistOp::Write));
                return;
            };
            let result = async {
                let dir = storage.ensure_collection(collection).await?;
                storage.write_text(&dir, &name, &content).await
            }
            .await;

            match result {
                Ok(()) => debug!(
                    "event=record_write module=store status=ok collection={} id={}",
                    collection, id
                ),
                Err(error) => sink.report(PersistFailure {
                    collection,
                    id,
                    op: PersistOp::Write,
                    error,
                }),
            }
        })
    }

    /// Schedules `<id>.md` to be removed if it exists.
    pub fn delete(&self, collection: Collection, id: &str) -> PersistTask {
        let storage = Arc::clone(&self.storage);
        let sink = Arc::clone(&self.sink);
        let id = id.to_string();
        self.spawn(async move {
            let Some(name) = record_file_name(&id) else {
                sink.report(rejected_id(collection, id, PersistOp::Delete));
                return;
            };
            let result = async {
                let dir = storage.ensure_collection(collection).await?;
                if storage.exists(&dir, &name).await? {
                    // Another task may remove the file between the two calls.
                    match storage.delete(&dir, &name).await {
                        Err(error) if error.is_not_found() => {}
                        other => other?,
                    }
                }
                Ok::<(), StorageError>(())
            }
            .await;

            match result {
                Ok(()) => debug!(
                    "event=record_delete module=store status=ok collection={} id={}",
                    collection, id
                ),
                Err(error) => sink.report(PersistFailure {
                    collection,
                    id,
                    op: PersistOp::Delete,
                    error,
                }),
            }
        })
    }

    /// Waits until every task spawned so far has finished.
    ///
    /// Tasks spawned while waiting are waited for as well.
    pub async fn settle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    fn spawn<F>(&self, task: F) -> PersistTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn_on(task, &self.runtime)
    }
}

fn rejected_id(collection: Collection, id: String, op: PersistOp) -> PersistFailure {
    PersistFailure {
        collection,
        error: StorageError::InvalidName {
            collection,
            name: id.clone(),
        },
        id,
        op,
    }
}
