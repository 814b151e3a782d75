use super::request::{EmptySelection, ResolvedIndices};
use crate::tasks::types::{TaskDescriptor, TaskKind};

use std::collections::HashSet;

/// Decides whether a running task is in scope for a stats query.
///
/// Only shard follow tasks are ever selected. The index check is a plain
/// set lookup; patterns were expanded before the query reached the node.
#[derive(Debug, Clone)]
pub struct FollowTaskPredicate {
    indices: HashSet<String>,
    empty_selection: EmptySelection,
}

impl FollowTaskPredicate {
    pub fn new(indices: &ResolvedIndices, empty_selection: EmptySelection) -> Self {
        Self {
            indices: indices.iter().cloned().collect(),
            empty_selection,
        }
    }

    pub fn matches(&self, descriptor: &TaskDescriptor) -> bool {
        if descriptor.kind != TaskKind::ShardFollow {
            return false;
        }

        if self.indices.is_empty() {
            return self.empty_selection == EmptySelection::MatchAll;
        }

        self.indices.contains(&descriptor.index)
    }
}
