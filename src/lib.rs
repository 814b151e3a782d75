//! Cross-Cluster Replication Node Library
//!
//! A cluster node that hosts shard follow tasks and answers cluster-wide
//! follow stats queries. The binary executable (`main.rs`) wires these
//! modules together.
//!
//! ## Architecture Modules
//! - **`membership`**: The node's view of the cluster (local node plus peers).
//! - **`tasks`**: Node-local running tasks, their registry and the shard follow task.
//! - **`stats`**: The scatter-gather follow stats query, from the per-node
//!   executor up to the cluster aggregator and its HTTP surface.
//! - **`config`**: Command line / environment configuration.
//! - **`app`**: Assembly of the above into a runnable node.

pub mod app;
pub mod config;
pub mod membership;
pub mod stats;
pub mod tasks;
