//! Node configuration, parsed from the command line with environment
//! variable fallbacks.

use crate::membership::types::Node;
use crate::stats::request::EmptySelection;

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LicenseMode {
    Active,
    Inactive,
}

/// A follower index this node hosts, as `index:shards`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSpec {
    pub index: String,
    pub shards: u32,
}

impl FromStr for FollowSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, shards) = match s.split_once(':') {
            Some((index, shards)) => {
                let shards = shards
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("invalid shard count in '{}': {}", s, e))?;
                (index.trim(), shards)
            }
            None => (s.trim(), 1),
        };

        if index.is_empty() {
            return Err(format!("empty index name in '{}'", s));
        }
        if shards == 0 {
            return Err(format!("shard count must be positive in '{}'", s));
        }

        Ok(Self {
            index: index.to_string(),
            shards,
        })
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "replication-node", about = "Cluster node serving follow task stats")]
pub struct NodeConfig {
    /// HTTP address this node listens on.
    #[arg(long, env = "NODE_BIND", default_value = "127.0.0.1:6000")]
    pub bind: SocketAddr,

    /// Stable node id; a random one is generated when absent.
    #[arg(long, env = "NODE_ID")]
    pub node_id: Option<String>,

    /// Cluster peer as `id=host:port`. Repeatable.
    #[arg(long = "peer")]
    pub peers: Vec<Node>,

    /// Index name known to the cluster. Repeatable.
    #[arg(long = "index")]
    pub indices: Vec<String>,

    /// Follower index hosted on this node as `index:shards`. Repeatable.
    #[arg(long = "follow")]
    pub follows: Vec<FollowSpec>,

    #[arg(long, env = "LEADER_CLUSTER", default_value = "leader")]
    pub leader_cluster: String,

    #[arg(long, env = "CCR_LICENSE", value_enum, default_value_t = LicenseMode::Active)]
    pub license: LicenseMode,

    /// What an empty resolved index set selects: `none` or `all`.
    #[arg(long, default_value = "none")]
    pub empty_selection: EmptySelection,

    #[arg(long, default_value_t = 4)]
    pub max_concurrent_stats: usize,

    #[arg(long, default_value_t = 5000)]
    pub request_timeout_ms: u64,

    /// Send attempts per node call; 1 means no retry.
    #[arg(long, default_value_t = 1)]
    pub transport_attempts: usize,
}

impl NodeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn license_active(&self) -> bool {
        self.license == LicenseMode::Active
    }

    /// Known indices plus every follower index hosted locally, deduplicated.
    pub fn known_indices(&self) -> Vec<String> {
        let mut indices: Vec<String> = self
            .indices
            .iter()
            .cloned()
            .chain(self.follows.iter().map(|f| f.index.clone()))
            .collect();
        indices.sort();
        indices.dedup();
        indices
    }
}
