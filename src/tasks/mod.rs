//! Node-Local Running Tasks
//!
//! Background work hosted by a single node, and the registry the node keeps
//! of it.
//!
//! ## Submodules
//! - **`types`**: Task identity, the capability descriptor, the status snapshot and `RunningTask`.
//! - **`registry`**: The node-owned map of running tasks, read through snapshots.
//! - **`follower`**: `ShardFollowTask`, the per-shard replication task and its progress counters.

pub mod follower;
pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;
