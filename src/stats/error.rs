//! Error types for the follow stats query.
//!
//! Three granularities, three types:
//! - `StatsError` ends the whole request before any node is contacted.
//! - `NodeError` replaces the contribution of exactly one node.
//! - task-level failures use `crate::tasks::types::TaskError` and only ever
//!   replace one task's snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request-level failure. No partial results accompany it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("current license is non-compliant for [{feature}]")]
    Compliance { feature: &'static str },

    #[error("no such index [{0}]")]
    IndexNotFound(String),

    #[error("invalid index pattern [{pattern}]: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl StatsError {
    pub fn compliance() -> Self {
        Self::Compliance { feature: "ccr" }
    }
}

/// Why a node's sub-query produced no result at all.
///
/// Serialized adjacently tagged so it can travel in the `503` body a node
/// returns when it refuses to run the operation.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "reason", rename_all = "snake_case")]
pub enum NodeError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("node rejected the request: {0}")]
    Rejected(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("node answered with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("invalid node response: {0}")]
    Decode(String),

    #[error("node operation aborted: {0}")]
    Aborted(String),
}
