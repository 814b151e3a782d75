//! Shard Follow Task
//!
//! The per-shard follower: pulls operations from a leader shard and applies
//! them to the matching follower shard. This type tracks the progress of that
//! work and exposes it as a `FollowTaskStatus` snapshot.
//!
//! ## State
//! All counters live behind a single `RwLock` so a snapshot is always
//! internally consistent. Replication code updates it through the `on_*`
//! hooks; the stats query only takes the read lock for the duration of one
//! copy.

use super::types::*;

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct FollowState {
    leader_global_checkpoint: i64,
    leader_max_seq_no: i64,
    follower_global_checkpoint: i64,
    follower_max_seq_no: i64,
    last_requested_seq_no: i64,
    outstanding_read_requests: u32,
    outstanding_write_requests: u32,
    successful_read_requests: u64,
    failed_read_requests: u64,
    operations_read: u64,
    bytes_read: u64,
    total_read_time_millis: u64,
    successful_write_requests: u64,
    failed_write_requests: u64,
    operations_written: u64,
    total_write_time_millis: u64,
    last_read_at: Option<u64>,
    last_read_error: Option<String>,
    fatal_error: Option<String>,
}

pub struct ShardFollowTask {
    id: TaskId,
    leader_cluster: String,
    leader_index: String,
    follow_shard: ShardId,
    state: RwLock<FollowState>,
    closed: AtomicBool,
}

impl ShardFollowTask {
    pub fn new(
        leader_cluster: impl Into<String>,
        leader_index: impl Into<String>,
        follow_shard: ShardId,
    ) -> Self {
        Self {
            id: TaskId::new(),
            leader_cluster: leader_cluster.into(),
            leader_index: leader_index.into(),
            follow_shard,
            state: RwLock::new(FollowState {
                leader_global_checkpoint: -1,
                leader_max_seq_no: -1,
                follower_global_checkpoint: -1,
                follower_max_seq_no: -1,
                last_requested_seq_no: -1,
                ..FollowState::default()
            }),
            closed: AtomicBool::new(false),
        }
    }

    pub fn follow_shard(&self) -> &ShardId {
        &self.follow_shard
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops the task. Later status calls fail with `TaskError::Closed`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!("Shard follow task {} for {} closed", self.id, self.follow_shard);
        }
    }

    /// A read request for operations up to `to_seq_no` was sent to the leader.
    pub fn on_read_requested(&self, to_seq_no: i64) {
        self.update(|state| {
            state.outstanding_read_requests += 1;
            state.last_requested_seq_no = state.last_requested_seq_no.max(to_seq_no);
        });
    }

    pub fn on_leader_checkpoint(&self, global_checkpoint: i64, max_seq_no: i64) {
        self.update(|state| {
            state.leader_global_checkpoint = state.leader_global_checkpoint.max(global_checkpoint);
            state.leader_max_seq_no = state.leader_max_seq_no.max(max_seq_no);
        });
    }

    pub fn on_read(&self, operations: u64, bytes: u64, took_millis: u64) {
        let now = now_ms();
        self.update(|state| {
            state.outstanding_read_requests = state.outstanding_read_requests.saturating_sub(1);
            state.successful_read_requests += 1;
            state.operations_read += operations;
            state.bytes_read += bytes;
            state.total_read_time_millis += took_millis;
            state.last_read_at = Some(now);
            state.last_read_error = None;
        });
    }

    pub fn on_read_failure(&self, error: impl Into<String>) {
        let error = error.into();
        tracing::warn!("Read failure on {}: {}", self.follow_shard, error);
        self.update(|state| {
            state.outstanding_read_requests = state.outstanding_read_requests.saturating_sub(1);
            state.failed_read_requests += 1;
            state.last_read_error = Some(error);
        });
    }

    pub fn on_write_requested(&self) {
        self.update(|state| state.outstanding_write_requests += 1);
    }

    /// A bulk write of `operations` finished; `max_seq_no` is the highest
    /// sequence number now present on the follower shard.
    pub fn on_write(&self, operations: u64, max_seq_no: i64, took_millis: u64) {
        self.update(|state| {
            state.outstanding_write_requests = state.outstanding_write_requests.saturating_sub(1);
            state.successful_write_requests += 1;
            state.operations_written += operations;
            state.total_write_time_millis += took_millis;
            state.follower_max_seq_no = state.follower_max_seq_no.max(max_seq_no);
        });
    }

    pub fn on_write_failure(&self, error: impl Into<String>) {
        let error = error.into();
        tracing::warn!("Write failure on {}: {}", self.follow_shard, error);
        self.update(|state| {
            state.outstanding_write_requests = state.outstanding_write_requests.saturating_sub(1);
            state.failed_write_requests += 1;
        });
    }

    pub fn on_follower_checkpoint(&self, global_checkpoint: i64) {
        self.update(|state| {
            state.follower_global_checkpoint =
                state.follower_global_checkpoint.max(global_checkpoint);
        });
    }

    /// Records an unrecoverable replication error. The task keeps reporting
    /// status so the error is visible through the stats API.
    pub fn on_fatal(&self, error: impl Into<String>) {
        let error = error.into();
        tracing::error!("Shard follow task {} failed: {}", self.id, error);
        self.update(|state| state.fatal_error = Some(error));
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut FollowState),
    {
        match self.state.write() {
            Ok(mut state) => f(&mut state),
            Err(poisoned) => {
                tracing::error!("State lock of task {} is poisoned", self.id);
                f(&mut poisoned.into_inner())
            }
        }
    }
}

impl RunningTask for ShardFollowTask {
    fn id(&self) -> &TaskId {
        &self.id
    }

    fn descriptor(&self) -> TaskDescriptor {
        TaskDescriptor {
            kind: TaskKind::ShardFollow,
            index: self.follow_shard.index.clone(),
        }
    }

    fn status(&self) -> Result<FollowTaskStatus, TaskError> {
        if self.is_closed() {
            return Err(TaskError::Closed(self.id.clone()));
        }

        let state = self
            .state
            .read()
            .map_err(|_| TaskError::Unavailable(format!("state of task {} is poisoned", self.id)))?;

        let now = now_ms();

        Ok(FollowTaskStatus {
            leader_cluster: self.leader_cluster.clone(),
            leader_index: self.leader_index.clone(),
            follower_index: self.follow_shard.index.clone(),
            shard_id: self.follow_shard.shard,
            leader_global_checkpoint: state.leader_global_checkpoint,
            leader_max_seq_no: state.leader_max_seq_no,
            follower_global_checkpoint: state.follower_global_checkpoint,
            follower_max_seq_no: state.follower_max_seq_no,
            last_requested_seq_no: state.last_requested_seq_no,
            outstanding_read_requests: state.outstanding_read_requests,
            outstanding_write_requests: state.outstanding_write_requests,
            successful_read_requests: state.successful_read_requests,
            failed_read_requests: state.failed_read_requests,
            operations_read: state.operations_read,
            bytes_read: state.bytes_read,
            total_read_time_millis: state.total_read_time_millis,
            successful_write_requests: state.successful_write_requests,
            failed_write_requests: state.failed_write_requests,
            operations_written: state.operations_written,
            total_write_time_millis: state.total_write_time_millis,
            time_since_last_read_millis: state.last_read_at.map(|at| now.saturating_sub(at)),
            last_read_error: state.last_read_error.clone(),
            fatal_error: state.fatal_error.clone(),
            captured_at: now,
        })
    }
}
