//! Published-item tracking
//!
//! This module remembers which items were published so later cycles skip
//! them. Only successful publications are recorded; a failed item shows up
//! as new again on the next cycle.

use crate::crawler::ItemCandidate;
use std::collections::HashSet;

/// Identities of the items already published by this process
///
/// The set only grows and lives as long as the scheduler that owns it; it
/// is never written to disk.
#[derive(Debug, Default, Clone)]
pub struct DedupTracker {
    seen: HashSet<String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the identity was already published
    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    /// Records a published identity; returns false if it was already known
    pub fn record(&mut self, identity: impl Into<String>) -> bool {
        self.seen.insert(identity.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Keeps the candidates that still need publishing
    ///
    /// Drops already-published identities and repeated identities within
    /// `candidates`, preserving listing order.
    pub fn filter_new(&self, candidates: Vec<ItemCandidate>) -> Vec<ItemCandidate> {
        let mut batch = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| !self.contains(c.identity()) && batch.insert(c.identity().to_string()))
            .collect()
    }
}
