use super::predicate::FollowTaskPredicate;
use crate::tasks::registry::{LocalTaskRegistry, TaskHandle};

use std::sync::Arc;

/// Read-only view over the node's running tasks.
pub struct LocalTaskScanner {
    registry: Arc<LocalTaskRegistry>,
}

impl LocalTaskScanner {
    pub fn new(registry: Arc<LocalTaskRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the tasks that match `predicate` at the instant of the call.
    ///
    /// The result reflects which tasks existed, not their state: a returned
    /// task may be closed by the time its status is fetched.
    pub fn scan(&self, predicate: &FollowTaskPredicate) -> Vec<TaskHandle> {
        let matched: Vec<TaskHandle> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|task| predicate.matches(&task.descriptor()))
            .collect();

        tracing::trace!(
            "Scanned {} running task(s), {} matched",
            self.registry.len(),
            matched.len()
        );

        matched
    }
}
