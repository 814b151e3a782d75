use super::response::{FollowStatsEntry, TaskOperationFailure, TaskStatsOutcome};
use crate::membership::types::NodeId;
use crate::tasks::types::{RunningTask, TaskError};

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Asks one task for its status and wraps the answer.
///
/// Never fails: an error or a panic inside the task's status accessor turns
/// into a `TaskOperationFailure` for that task id, so one broken task cannot
/// hide the others running on the same node.
///
/// # Arguments
/// * `node_id` - The node the task runs on, copied into the outcome.
/// * `task` - A task selected by the scan; it may have closed since.
pub fn fetch_status(node_id: &NodeId, task: &dyn RunningTask) -> TaskStatsOutcome {
    let task_id = task.id().clone();

    let result = catch_unwind(AssertUnwindSafe(|| task.status())).unwrap_or_else(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(TaskError::Panicked(message))
    });

    match result {
        Ok(status) => {
            tracing::trace!("Fetched status of task {}", task_id);
            TaskStatsOutcome::Stats(FollowStatsEntry {
                node_id: node_id.clone(),
                task_id,
                status,
            })
        }
        Err(e) => {
            tracing::warn!("Failed to fetch status of task {}: {}", task_id, e);
            TaskStatsOutcome::Failure(TaskOperationFailure {
                node_id: node_id.clone(),
                task_id,
                reason: e.to_string(),
            })
        }
    }
}
