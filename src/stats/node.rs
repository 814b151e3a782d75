//! Per-Node Stats Executor
//!
//! Runs the node-local half of a follow stats query: scan the running tasks,
//! then fetch the status of each match.
//!
//! ## Admission
//! A bounded number of stats operations may run at once on a node. When no
//! slot is free, or the node is shutting down, the whole operation is
//! rejected with a single `NodeError` and no task is touched.

use super::error::NodeError;
use super::fetch::fetch_status;
use super::predicate::FollowTaskPredicate;
use super::protocol::{NodeStatsRequest, NodeStatsResponse};
use super::scanner::LocalTaskScanner;
use crate::membership::types::NodeId;
use crate::tasks::registry::LocalTaskRegistry;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;

pub struct NodeStatsExecutor {
    node_id: NodeId,
    scanner: LocalTaskScanner,
    /// One permit per stats operation allowed to run concurrently.
    permits: Semaphore,
    closed: AtomicBool,
}

impl NodeStatsExecutor {
    /// Creates the executor for one node.
    ///
    /// # Arguments
    /// * `node_id` - Identity stamped on every outcome this node produces.
    /// * `registry` - The node's running tasks.
    /// * `max_concurrent` - Stats operations admitted at once, capped at
    ///   `Semaphore::MAX_PERMITS`. Zero rejects everything.
    pub fn new(
        node_id: NodeId,
        registry: Arc<LocalTaskRegistry>,
        max_concurrent: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            node_id,
            scanner: LocalTaskScanner::new(registry),
            permits: Semaphore::new(max_concurrent.min(Semaphore::MAX_PERMITS)),
            closed: AtomicBool::new(false),
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Stops admitting new stats operations.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        tracing::info!("Follow stats executor on {} closed", self.node_id);
    }

    pub fn execute(&self, request: &NodeStatsRequest) -> Result<NodeStatsResponse, NodeError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(NodeError::Rejected(format!(
                "node {} is shutting down",
                self.node_id
            )));
        }

        let _permit = self.permits.try_acquire().map_err(|_| {
            tracing::warn!("Rejecting follow stats on {}: executor saturated", self.node_id);
            NodeError::Rejected(format!(
                "follow stats executor on node {} is saturated",
                self.node_id
            ))
        })?;

        let predicate = FollowTaskPredicate::new(&request.indices, request.empty_selection);
        let tasks = self.scanner.scan(&predicate);

        let outcomes = tasks
            .iter()
            .map(|task| fetch_status(&self.node_id, task.as_ref()))
            .collect::<Vec<_>>();

        tracing::debug!(
            "Follow stats on {}: {} matching task(s) for {} index name(s)",
            self.node_id,
            outcomes.len(),
            request.indices.len()
        );

        Ok(NodeStatsResponse {
            node_id: self.node_id.clone(),
            outcomes,
        })
    }

    /// Runs `execute` on the blocking pool so status accessors never stall
    /// the async runtime.
    pub async fn execute_blocking(
        self: &Arc<Self>,
        request: NodeStatsRequest,
    ) -> Result<NodeStatsResponse, NodeError> {
        let executor = self.clone();

        tokio::task::spawn_blocking(move || executor.execute(&request))
            .await
            .map_err(|e| NodeError::Aborted(e.to_string()))?
    }
}
