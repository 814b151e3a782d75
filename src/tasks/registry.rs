//! Local Task Registry
//!
//! Node-local set of running tasks. The node process owns it: follow tasks
//! are registered when they start and unregistered when they stop. The stats
//! query only ever reads it through `snapshot()`.

use super::types::*;

use dashmap::DashMap;
use std::sync::Arc;

/// Type alias for a shared, type-erased running task handle.
pub type TaskHandle = Arc<dyn RunningTask>;

pub struct LocalTaskRegistry {
    tasks: DashMap<TaskId, TaskHandle>,
}

impl LocalTaskRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tasks: DashMap::new(),
        })
    }

    /// Adds a task. Registering the same id twice replaces the older handle.
    pub fn register(&self, task: TaskHandle) {
        let id = task.id().clone();
        let descriptor = task.descriptor();

        if self.tasks.insert(id.clone(), task).is_some() {
            tracing::warn!("Replaced running task {}", id);
        }

        tracing::info!(
            "Registered task {} ({:?} on index '{}')",
            id,
            descriptor.kind,
            descriptor.index
        );
    }

    /// Removes a task once it has stopped.
    ///
    /// # Returns
    /// * `Some(handle)` of the removed task.
    /// * `None` if no task with this id was registered.
    pub fn unregister(&self, id: &TaskId) -> Option<TaskHandle> {
        let removed = self.tasks.remove(id).map(|(_, task)| task);
        if removed.is_some() {
            tracing::info!("Unregistered task {}", id);
        }
        removed
    }

    pub fn get(&self, id: &TaskId) -> Option<TaskHandle> {
        self.tasks.get(id).map(|entry| entry.value().clone())
    }

    /// Copies out the handles of every task running right now.
    ///
    /// No shard lock of the map is held once this returns.
    pub fn snapshot(&self) -> Vec<TaskHandle> {
        self.tasks
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for LocalTaskRegistry {
    fn default() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }
}
