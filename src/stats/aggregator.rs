//! Cluster Stats Aggregator
//!
//! Scatter-gather over every member of the cluster:
//!
//! 1. **Gate**: the license check runs once. On failure the query is
//!    `Rejected` and no node is contacted. It is the only way a query fails
//!    as a whole.
//! 2. **Dispatching**: one task per node is spawned with the same resolved
//!    index set. The member list is read once, here.
//! 3. **Collecting**: every spawned task is awaited until it settles; a slow
//!    or failed node never cancels its siblings.
//! 4. **Merged**: per-node outcomes are flattened into `StatsResponses`.
//!
//! Index patterns are expanded by the caller (see `resolver`); the aggregator
//! only ever sees concrete names.

use super::error::{NodeError, StatsError};
use super::license::LicenseChecker;
use super::protocol::NodeStatsRequest;
use super::request::{EmptySelection, ResolvedIndices};
use super::response::{NodeOutcome, StatsResponses};
use super::transport::NodeTransport;
use crate::membership::service::Membership;

use futures::future::join_all;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Dispatching,
    Collecting,
    Merged,
    Rejected,
}

/// Progress of one query through the scatter-gather phases.
#[derive(Debug)]
pub struct StatsQuery {
    phase: QueryPhase,
    dispatched: usize,
}

impl StatsQuery {
    pub fn new() -> Self {
        Self {
            phase: QueryPhase::Idle,
            dispatched: 0,
        }
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    /// Number of nodes the query was sent to.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    fn advance(&mut self, next: QueryPhase) {
        tracing::debug!("Follow stats query {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ClusterStatsAggregator {
    membership: Arc<Membership>,
    transport: Arc<dyn NodeTransport>,
    license: Arc<dyn LicenseChecker>,
    empty_selection: EmptySelection,
}

impl ClusterStatsAggregator {
    /// Creates an aggregator over the given cluster view.
    ///
    /// # Arguments
    /// * `membership` - Source of the member list, read once per query.
    /// * `transport` - Delivers the per-node request, local node included.
    /// * `license` - Entry gate evaluated before any dispatch.
    /// * `empty_selection` - What an empty resolved index set selects on each node.
    pub fn new(
        membership: Arc<Membership>,
        transport: Arc<dyn NodeTransport>,
        license: Arc<dyn LicenseChecker>,
        empty_selection: EmptySelection,
    ) -> Self {
        Self {
            membership,
            transport,
            license,
            empty_selection,
        }
    }

    /// Runs one cluster-wide follow stats query for already resolved indices.
    ///
    /// # Returns
    /// * `Ok(StatsResponses)` once every node has settled, partial failures included.
    /// * `Err(StatsError::Compliance)` if the license gate refuses the query.
    pub async fn execute(&self, indices: &ResolvedIndices) -> Result<StatsResponses, StatsError> {
        let mut query = StatsQuery::new();
        self.execute_query(&mut query, indices).await
    }

    /// Same as `execute`, recording the phases in `query`.
    pub async fn execute_query(
        &self,
        query: &mut StatsQuery,
        indices: &ResolvedIndices,
    ) -> Result<StatsResponses, StatsError> {
        if !self.license.is_allowed() {
            tracing::warn!("Follow stats rejected: license does not allow ccr");
            query.advance(QueryPhase::Rejected);
            return Err(StatsError::compliance());
        }

        let node_request = Arc::new(NodeStatsRequest {
            indices: indices.clone(),
            empty_selection: self.empty_selection,
        });

        query.advance(QueryPhase::Dispatching);
        let nodes = self.membership.get_members();
        query.dispatched = nodes.len();

        tracing::debug!(
            "Dispatching follow stats for {} index name(s) to {} node(s)",
            node_request.indices.len(),
            nodes.len()
        );

        let (node_ids, handles): (Vec<_>, Vec<_>) = nodes
            .into_iter()
            .map(|node| {
                let transport = self.transport.clone();
                let request = node_request.clone();
                let node_id = node.id.clone();
                let handle = tokio::spawn(async move {
                    transport
                        .node_stats(&node, &request)
                        .await
                        .map(|response| response.outcomes)
                });
                (node_id, handle)
            })
            .unzip();

        query.advance(QueryPhase::Collecting);
        let settled = join_all(handles).await;

        let outcomes: Vec<NodeOutcome> = node_ids
            .into_iter()
            .zip(settled)
            .map(|(node_id, joined)| {
                let result = joined.unwrap_or_else(|e| Err(NodeError::Aborted(e.to_string())));
                (node_id, result)
            })
            .collect();

        let responses = StatsResponses::merge(outcomes);
        query.advance(QueryPhase::Merged);

        tracing::info!(
            "Follow stats: {} snapshot(s), {} task failure(s), {} node failure(s)",
            responses.stats.len(),
            responses.task_failures.len(),
            responses.node_failures.len()
        );

        Ok(responses)
    }
}
