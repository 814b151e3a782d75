//! Network Protocol Definitions
//!
//! Endpoints and DTOs for the follow stats query, both the internal per-node
//! call and the public cluster-wide endpoint.

use super::error::NodeError;
use super::request::{EmptySelection, ResolvedIndices};
use super::response::{
    FollowStatsEntry, NodeFailure, StatsResponses, TaskOperationFailure, TaskStatsOutcome,
};
use crate::membership::types::NodeId;

use serde::{Deserialize, Serialize};

pub const ENDPOINT_FOLLOW_STATS: &str = "/follow/stats";
pub const ENDPOINT_NODE_STATS: &str = "/internal/follow_stats";
pub const ENDPOINT_HEALTH: &str = "/health";

/// The request every node receives: already resolved, no patterns left.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeStatsRequest {
    pub indices: ResolvedIndices,
    #[serde(default)]
    pub empty_selection: EmptySelection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeStatsResponse {
    pub node_id: NodeId,
    pub outcomes: Vec<TaskStatsOutcome>,
}

/// Body of the `503` a node answers with when it will not run the operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeErrorBody {
    pub node_id: NodeId,
    pub error: NodeError,
}

#[derive(Debug, Deserialize)]
pub struct FollowStatsParams {
    /// Comma separated index names or patterns. Absent means all.
    pub index: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexFollowStats {
    pub index: String,
    pub shards: Vec<FollowStatsEntry>,
}

/// Public rendering of `StatsResponses`, grouped per follower index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowStatsView {
    pub indices: Vec<IndexFollowStats>,
    pub task_failures: Vec<TaskOperationFailure>,
    pub node_failures: Vec<NodeFailure>,
}

impl From<StatsResponses> for FollowStatsView {
    fn from(responses: StatsResponses) -> Self {
        let indices = responses
            .by_index()
            .into_iter()
            .map(|(index, shards)| IndexFollowStats { index, shards })
            .collect();

        Self {
            indices,
            task_failures: responses.task_failures,
            node_failures: responses.node_failures,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub node_id: NodeId,
    pub members: usize,
    pub running_tasks: usize,
}
