use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single member of the cluster as seen by the local node.
///
/// Only the HTTP address is tracked: every inter-node call made by the stats
/// query goes through the internal HTTP API of the target node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub http_addr: SocketAddr,
}

impl Node {
    pub fn new(id: impl Into<String>, http_addr: SocketAddr) -> Self {
        Self {
            id: NodeId(id.into()),
            http_addr,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.http_addr)
    }
}

/// Parses the `id=host:port` form used by `--peer`.
impl FromStr for Node {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, addr) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <id>=<addr:port>, got '{}'", s))?;

        let id = id.trim();
        if id.is_empty() {
            return Err(format!("empty node id in '{}'", s));
        }

        let http_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| format!("invalid address in '{}': {}", s, e))?;

        Ok(Node::new(id, http_addr))
    }
}
