use dashmap::DashMap;
use std::sync::Arc;

use super::types::{Node, NodeId};

/// The local node's view of the cluster topology.
///
/// Members are seeded from configuration and can be added or removed at
/// runtime. The stats aggregator takes one snapshot of the member list per
/// query, so changes made while a query is in flight only affect later
/// queries.
pub struct Membership {
    pub local_node: Node,
    pub members: Arc<DashMap<NodeId, Node>>,
}

impl Membership {
    pub fn new(local_node: Node, peers: Vec<Node>) -> Arc<Self> {
        let members = Arc::new(DashMap::new());
        members.insert(local_node.id.clone(), local_node.clone());

        for peer in peers {
            if peer.id == local_node.id {
                tracing::warn!("Ignoring peer entry that reuses the local node id {}", peer.id);
                continue;
            }
            tracing::info!("Registered peer {} at {}", peer.id, peer.http_addr);
            members.insert(peer.id.clone(), peer);
        }

        tracing::info!("Cluster view initialised with {} member(s)", members.len());

        Arc::new(Self {
            local_node,
            members,
        })
    }

    /// Every known member including the local node, ordered by node id.
    pub fn get_members(&self) -> Vec<Node> {
        let mut members: Vec<Node> = self
            .members
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        members
    }

    pub fn get_member(&self, id: &NodeId) -> Option<Node> {
        self.members.get(id).map(|entry| entry.value().clone())
    }

    pub fn add_member(&self, node: Node) {
        tracing::info!("Node {} joining cluster at {}", node.id, node.http_addr);
        self.members.insert(node.id.clone(), node);
        tracing::info!("Cluster size now: {}", self.members.len());
    }

    /// Removes a peer. The local node can never be removed from its own view.
    pub fn remove_member(&self, id: &NodeId) -> Option<Node> {
        if id == &self.local_node.id {
            return None;
        }
        let removed = self.members.remove(id).map(|(_, node)| node);
        if removed.is_some() {
            tracing::info!("Node {} left cluster, size now: {}", id, self.members.len());
        }
        removed
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_local(&self, id: &NodeId) -> bool {
        id == &self.local_node.id
    }
}
