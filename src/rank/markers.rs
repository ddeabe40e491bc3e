use indexmap::IndexSet;
use std::hash::Hash;

/// Identity set recording which elements have already been processed.
///
/// Handles are copyable, non-owning ids, so a marker never keeps a node
/// removed from the page alive. One instance tracks annotated cards,
/// another tracks sorted containers; both live exactly as long as the
/// controller and reset on page reload.
#[derive(Debug, Clone)]
pub struct ProcessedSet<N: Copy + Eq + Hash> {
    seen: IndexSet<N>,
}

impl<N: Copy + Eq + Hash> ProcessedSet<N> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            seen: IndexSet::new(),
        }
    }

    /// Mark an element as processed; returns true if it was not marked before
    pub fn mark(&mut self, node: N) -> bool {
        self.seen.insert(node)
    }

    /// Check whether an element has been processed
    pub fn is_marked(&self, node: N) -> bool {
        self.seen.contains(&node)
    }

    /// Number of marked elements
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True if nothing has been marked
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget all markers
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl<N: Copy + Eq + Hash> Default for ProcessedSet<N> {
    fn default() -> Self {
        Self::new()
    }
}
