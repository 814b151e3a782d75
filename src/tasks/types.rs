use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a running task on a node.
///
/// Wrapper around a UUID string. Task ids are only meaningful together with
/// the node that runs the task; no cluster-wide directory maps ids to nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generates a new random UUID v4-based TaskId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of background work a task performs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Replicates one leader shard into a follower shard.
    ShardFollow,
    /// Any other background work hosted by the node.
    Other(String),
}

/// Stable capability descriptor every running task exposes.
///
/// Task selection is done on this descriptor alone, never on the concrete
/// type behind the `RunningTask` trait object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub kind: TaskKind,
    /// The index the task works on (the follower index for follow tasks).
    pub index: String,
}

/// Identifies one shard of an index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardId {
    pub index: String,
    pub shard: u32,
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}]", self.index, self.shard)
    }
}

/// Point-in-time copy of a shard follow task's observable state.
///
/// Built fresh by every `status()` call; holding one never keeps the task
/// alive or locked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowTaskStatus {
    pub leader_cluster: String,
    pub leader_index: String,
    pub follower_index: String,
    pub shard_id: u32,
    pub leader_global_checkpoint: i64,
    pub leader_max_seq_no: i64,
    pub follower_global_checkpoint: i64,
    pub follower_max_seq_no: i64,
    pub last_requested_seq_no: i64,
    pub outstanding_read_requests: u32,
    pub outstanding_write_requests: u32,
    pub successful_read_requests: u64,
    pub failed_read_requests: u64,
    pub operations_read: u64,
    pub bytes_read: u64,
    pub total_read_time_millis: u64,
    pub successful_write_requests: u64,
    pub failed_write_requests: u64,
    pub operations_written: u64,
    pub total_write_time_millis: u64,
    /// `None` until the first successful read.
    pub time_since_last_read_millis: Option<u64>,
    pub last_read_error: Option<String>,
    pub fatal_error: Option<String>,
    /// Timestamp (ms) at which this snapshot was taken.
    pub captured_at: u64,
}

/// Failure to obtain a status snapshot from a task.
///
/// This says nothing about whether the task itself is healthy; it only
/// describes why this particular status call did not produce a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {0} is no longer running")]
    Closed(TaskId),

    #[error("task status unavailable: {0}")]
    Unavailable(String),

    #[error("task status accessor panicked: {0}")]
    Panicked(String),
}

/// A handle to background work running on this node.
pub trait RunningTask: Send + Sync {
    fn id(&self) -> &TaskId;

    fn descriptor(&self) -> TaskDescriptor;

    /// Produces a fresh status snapshot.
    fn status(&self) -> Result<FollowTaskStatus, TaskError>;
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
