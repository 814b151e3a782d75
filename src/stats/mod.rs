//! Follow Stats Module
//!
//! Cluster-wide status query for shard follow tasks. Every node filters its
//! own running tasks; no node needs to know where a task lives.
//!
//! ## Flow
//! `StatsRequest` → license gate → index resolution → one `NodeStatsRequest`
//! per cluster member → `NodeStatsExecutor` on each node (scan + fetch) →
//! `StatsResponses` merged from every node's outcome.
//!
//! ## Failure isolation
//! - A task whose status cannot be read becomes a `TaskOperationFailure`.
//! - A node that cannot answer becomes a `NodeFailure`.
//! - Only the license gate and resolution fail the request as a whole.
//!
//! ## Submodules
//! - **`predicate`**, **`scanner`**, **`fetch`**: node-local building blocks.
//! - **`node`**: the per-node executor with admission control.
//! - **`aggregator`**: the scatter-gather state machine.
//! - **`transport`**: in-process and HTTP delivery of node requests.
//! - **`resolver`**, **`license`**: collaborators consulted before dispatch.
//! - **`protocol`**, **`handlers`**: HTTP contracts and axum handlers.

pub mod aggregator;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod license;
pub mod node;
pub mod predicate;
pub mod protocol;
pub mod request;
pub mod resolver;
pub mod response;
pub mod scanner;
pub mod transport;
