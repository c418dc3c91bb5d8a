//! In-memory task registry for progress tracking.
//!
//! The registry is the only shared mutable resource in the system. Each
//! entry has one writer, the job that owns it, plus arbitrarily many
//! concurrent readers polling for progress. Entries are never evicted.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use tracing::warn;

use revid_models::{OutputKind, Task, TaskId};

/// Concurrency-safe map from task ID to task state.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry in `processing` state.
    ///
    /// IDs are freshly generated per dispatch, so a collision indicates a
    /// bug upstream; the entry is replaced and the collision logged.
    pub async fn create(&self, id: TaskId) {
        let mut tasks = self.tasks.write().await;
        if tasks.insert(id.clone(), Task::processing(id.clone())).is_some() {
            warn!("Task ID collision on create: {}", id);
        }
    }

    /// Record the terminal `completed` state with the produced output names.
    ///
    /// The owning job invokes this at most once per ID.
    pub async fn complete(&self, id: &TaskId, outputs: BTreeMap<OutputKind, String>) {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(id) {
            Some(task) => task.complete(outputs),
            None => warn!("Completed unknown task: {}", id),
        }
    }

    /// Record the terminal `error` state with a diagnostic message.
    ///
    /// The owning job invokes this at most once per ID.
    pub async fn fail(&self, id: &TaskId, message: impl Into<String>) {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(id) {
            Some(task) => task.fail(message),
            None => warn!("Failed unknown task: {}", id),
        }
    }

    /// Get a snapshot of the entry for an ID, if it exists.
    pub async fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }
}
