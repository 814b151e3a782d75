//! Node assembly: builds every component from a `NodeConfig` and exposes
//! the HTTP router.

use crate::config::NodeConfig;
use crate::membership::service::Membership;
use crate::membership::types::{Node, NodeId};
use crate::stats::aggregator::ClusterStatsAggregator;
use crate::stats::handlers::{handle_follow_stats, handle_health, handle_node_stats};
use crate::stats::license::LicenseState;
use crate::stats::node::NodeStatsExecutor;
use crate::stats::protocol::{ENDPOINT_FOLLOW_STATS, ENDPOINT_HEALTH, ENDPOINT_NODE_STATS};
use crate::stats::resolver::{IndexResolver, PatternResolver};
use crate::stats::transport::HttpTransport;
use crate::tasks::follower::ShardFollowTask;
use crate::tasks::registry::LocalTaskRegistry;
use crate::tasks::types::{RunningTask, ShardId};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;

pub struct NodeContext {
    pub membership: Arc<Membership>,
    pub registry: Arc<LocalTaskRegistry>,
    pub executor: Arc<NodeStatsExecutor>,
    pub aggregator: Arc<ClusterStatsAggregator>,
    pub license: Arc<LicenseState>,
    pub resolver: Arc<dyn IndexResolver>,
    pub follow_tasks: Vec<Arc<ShardFollowTask>>,
}

impl NodeContext {
    pub fn build(config: &NodeConfig) -> Self {
        let node_id = config
            .node_id
            .clone()
            .map(NodeId)
            .unwrap_or_default();
        let local_node = Node {
            id: node_id.clone(),
            http_addr: config.bind,
        };

        let membership = Membership::new(local_node, config.peers.clone());
        let registry = LocalTaskRegistry::new();

        let follow_tasks = start_follow_tasks(config, &registry);

        let executor =
            NodeStatsExecutor::new(node_id, registry.clone(), config.max_concurrent_stats);
        let transport = HttpTransport::new(
            executor.clone(),
            config.request_timeout(),
            config.transport_attempts,
        );
        let license = Arc::new(LicenseState::new(config.license_active()));
        let resolver: Arc<dyn IndexResolver> =
            Arc::new(PatternResolver::new(config.known_indices()));

        let aggregator = Arc::new(ClusterStatsAggregator::new(
            membership.clone(),
            Arc::new(transport),
            license.clone(),
            config.empty_selection,
        ));

        Self {
            membership,
            registry,
            executor,
            aggregator,
            license,
            resolver,
            follow_tasks,
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(ENDPOINT_FOLLOW_STATS, get(handle_follow_stats))
            .route(ENDPOINT_NODE_STATS, post(handle_node_stats))
            .route(ENDPOINT_HEALTH, get(handle_health))
            .layer(Extension(self.aggregator.clone()))
            .layer(Extension(self.resolver.clone()))
            .layer(Extension(self.executor.clone()))
            .layer(Extension(self.membership.clone()))
            .layer(Extension(self.registry.clone()))
    }

    /// Stops accepting stats operations and closes every follow task.
    pub fn shutdown(&self) {
        self.executor.close();
        for task in &self.follow_tasks {
            task.close();
            self.registry.unregister(task.id());
        }
    }
}

fn start_follow_tasks(
    config: &NodeConfig,
    registry: &Arc<LocalTaskRegistry>,
) -> Vec<Arc<ShardFollowTask>> {
    let mut tasks = Vec::new();

    for follow in &config.follows {
        for shard in 0..follow.shards {
            let task = Arc::new(ShardFollowTask::new(
                config.leader_cluster.clone(),
                follow.index.clone(),
                ShardId {
                    index: follow.index.clone(),
                    shard,
                },
            ));
            registry.register(task.clone());
            tasks.push(task);
        }
    }

    tracing::info!("Started {} shard follow task(s)", tasks.len());
    tasks
}
