//! Result types of the follow stats query and the merge that builds them.

use super::error::NodeError;
use crate::membership::types::NodeId;
use crate::tasks::types::{FollowTaskStatus, TaskId};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A status snapshot together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowStatsEntry {
    pub node_id: NodeId,
    pub task_id: TaskId,
    pub status: FollowTaskStatus,
}

/// A task that matched but whose status could not be read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskOperationFailure {
    pub node_id: NodeId,
    pub task_id: TaskId,
    pub reason: String,
}

/// A node that produced no result for the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeFailure {
    pub node_id: NodeId,
    pub error: NodeError,
}

/// Outcome of one matched task on one node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatsOutcome {
    Stats(FollowStatsEntry),
    Failure(TaskOperationFailure),
}

/// What one node contributed to a query: its task outcomes, or why it
/// contributed nothing.
pub type NodeOutcome = (NodeId, Result<Vec<TaskStatsOutcome>, NodeError>);

/// Aggregate answer of a follow stats query.
///
/// All three lists are always serialized, even when empty. A response with
/// non-empty failure lists is still a successful response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatsResponses {
    pub stats: Vec<FollowStatsEntry>,
    pub task_failures: Vec<TaskOperationFailure>,
    pub node_failures: Vec<NodeFailure>,
}

impl StatsResponses {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Flattens per-node outcomes into one response.
    ///
    /// Arrival order does not matter: a failed node adds exactly one
    /// `NodeFailure`, a responding node adds each of its outcomes to either
    /// `stats` or `task_failures`.
    pub fn merge<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = NodeOutcome>,
    {
        let mut responses = Self::empty();

        for (node_id, result) in outcomes {
            match result {
                Ok(task_outcomes) => {
                    for outcome in task_outcomes {
                        match outcome {
                            TaskStatsOutcome::Stats(entry) => responses.stats.push(entry),
                            TaskStatsOutcome::Failure(failure) => {
                                responses.task_failures.push(failure)
                            }
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!("Node {} failed follow stats: {}", node_id, error);
                    responses.node_failures.push(NodeFailure { node_id, error });
                }
            }
        }

        responses
    }

    pub fn has_failures(&self) -> bool {
        !self.task_failures.is_empty() || !self.node_failures.is_empty()
    }

    /// Entries grouped by follower index, shards in ascending order.
    ///
    /// Each entry keeps its node and task id so it can be matched against
    /// `task_failures`.
    pub fn by_index(&self) -> BTreeMap<String, Vec<FollowStatsEntry>> {
        let mut grouped: BTreeMap<String, Vec<FollowStatsEntry>> = BTreeMap::new();

        for entry in &self.stats {
            grouped
                .entry(entry.status.follower_index.clone())
                .or_default()
                .push(entry.clone());
        }

        for shards in grouped.values_mut() {
            shards.sort_by(|a, b| {
                a.status
                    .shard_id
                    .cmp(&b.status.shard_id)
                    .then_with(|| a.node_id.cmp(&b.node_id))
            });
        }

        grouped
    }
}
