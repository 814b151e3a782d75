//! Membership Module
//!
//! Holds the cluster topology as seen by one node: its own identity plus the
//! set of peers it can reach over HTTP.
//!
//! ## Core Concepts
//! - **Static seeding**: peers are declared at startup (`--peer id=addr`).
//! - **Snapshot reads**: callers take a point-in-time copy of the member list;
//!   nothing holds a reference into the map while doing network I/O.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
