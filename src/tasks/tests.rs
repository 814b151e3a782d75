//! Tasks Module Tests
//!
//! ## Test Scopes
//! - **Registry**: Registration, replacement, removal and snapshot isolation.
//! - **Follow Task**: Progress counters, error state and the closed state.
//! - **Data Types**: Status snapshot serialization.

#[cfg(test)]
mod tests {
    use crate::tasks::follower::ShardFollowTask;
    use crate::tasks::registry::LocalTaskRegistry;
    use crate::tasks::types::{RunningTask, ShardId, TaskError, TaskId, TaskKind};
    use std::sync::Arc;

    fn follow_task(index: &str, shard: u32) -> Arc<ShardFollowTask> {
        Arc::new(ShardFollowTask::new(
            "leader",
            format!("leader-{}", index),
            ShardId {
                index: index.to_string(),
                shard,
            },
        ))
    }

    // ============================================================
    // TEST 1: LocalTaskRegistry
    // ============================================================

    #[test]
    fn test_registry_register_and_unregister() {
        // ARRANGE
        let registry = LocalTaskRegistry::new();
        let task = follow_task("logs", 0);
        let id = task.id().clone();

        // ACT
        registry.register(task);

        // ASSERT
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&id).is_some());

        let removed = registry.unregister(&id);
        assert!(removed.is_some());
        assert!(registry.is_empty());
        assert!(registry.unregister(&id).is_none());
    }

    #[test]
    fn test_registry_snapshot_is_detached() {
        // ARRANGE: two tasks registered
        let registry = LocalTaskRegistry::new();
        let first = follow_task("logs", 0);
        let second = follow_task("logs", 1);
        let second_id = second.id().clone();

        registry.register(first);
        registry.register(second);

        // ACT: snapshot, then remove one task
        let snapshot = registry.snapshot();
        registry.unregister(&second_id);

        // ASSERT: handles copied before the removal stay usable
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 1);
        assert!(snapshot.iter().any(|t| t.id() == &second_id));
    }

    #[test]
    fn test_task_id_is_unique() {
        let id1 = TaskId::new();
        let id2 = TaskId::new();

        assert_ne!(id1, id2);
    }

    // ============================================================
    // TEST 2: ShardFollowTask
    // ============================================================

    #[test]
    fn test_follow_task_descriptor() {
        let task = follow_task("metrics", 3);
        let descriptor = task.descriptor();

        assert_eq!(descriptor.kind, TaskKind::ShardFollow);
        assert_eq!(descriptor.index, "metrics");
        assert_eq!(task.follow_shard().to_string(), "[metrics][3]");
    }

    #[test]
    fn test_fresh_follow_task_status() {
        let task = follow_task("metrics", 3);

        let status = task.status().expect("status of a fresh task");

        assert_eq!(status.follower_index, "metrics");
        assert_eq!(status.leader_index, "leader-metrics");
        assert_eq!(status.shard_id, 3);
        assert_eq!(status.leader_global_checkpoint, -1);
        assert_eq!(status.follower_max_seq_no, -1);
        assert_eq!(status.operations_read, 0);
        assert!(status.time_since_last_read_millis.is_none());
        assert!(status.fatal_error.is_none());
    }

    #[test]
    fn test_follow_task_counters() {
        let task = follow_task("logs", 0);

        task.on_leader_checkpoint(99, 120);
        task.on_read_requested(63);
        task.on_read(64, 4096, 12);
        task.on_write_requested();
        task.on_write(64, 63, 7);
        task.on_follower_checkpoint(63);

        let status = task.status().unwrap();

        assert_eq!(status.leader_global_checkpoint, 99);
        assert_eq!(status.leader_max_seq_no, 120);
        assert_eq!(status.last_requested_seq_no, 63);
        assert_eq!(status.outstanding_read_requests, 0);
        assert_eq!(status.successful_read_requests, 1);
        assert_eq!(status.operations_read, 64);
        assert_eq!(status.bytes_read, 4096);
        assert_eq!(status.total_read_time_millis, 12);
        assert_eq!(status.outstanding_write_requests, 0);
        assert_eq!(status.operations_written, 64);
        assert_eq!(status.follower_max_seq_no, 63);
        assert_eq!(status.follower_global_checkpoint, 63);
        assert!(status.time_since_last_read_millis.is_some());
    }

    #[test]
    fn test_follow_task_failures_are_reported_in_status() {
        let task = follow_task("logs", 0);

        task.on_read_requested(10);
        task.on_read_failure("leader shard not available");
        task.on_write_requested();
        task.on_write_failure("mapping conflict");
        task.on_fatal("leader index deleted");

        let status = task.status().unwrap();

        assert_eq!(status.failed_read_requests, 1);
        assert_eq!(status.failed_write_requests, 1);
        assert_eq!(status.outstanding_read_requests, 0);
        assert_eq!(
            status.last_read_error.as_deref(),
            Some("leader shard not available")
        );
        assert_eq!(status.fatal_error.as_deref(), Some("leader index deleted"));
    }

    #[test]
    fn test_closed_follow_task_fails_status() {
        let task = follow_task("logs", 0);
        task.close();

        assert!(task.is_closed());
        assert_eq!(
            task.status().unwrap_err(),
            TaskError::Closed(task.id().clone())
        );
    }

    // ============================================================
    // TEST 3: Serialization
    // ============================================================

    #[test]
    fn test_status_serialization() {
        let task = follow_task("logs", 2);
        task.on_read(5, 100, 1);

        let status = task.status().unwrap();
        let json = serde_json::to_value(&status).expect("Serialization failed");

        assert_eq!(json["follower_index"], "logs");
        assert_eq!(json["shard_id"], 2);
        assert_eq!(json["operations_read"], 5);
        assert!(json["fatal_error"].is_null());
    }
}
