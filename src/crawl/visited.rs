// src/crawl/visited.rs
// =============================================================================
// The set of URLs a crawl has already claimed.
//
// "Claiming" a URL means: this task, and only this task, will fetch it.
// The check and the insert have to be one atomic step. Checking first and
// inserting later would let two workers that found the same link at the
// same moment both believe they were first.
//
// DashSet shards its keys across several locks, and `insert` checks and
// inserts under the shard lock, so claims on unrelated URLs rarely contend.
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true on the first call for it; false on
    /// every later call.
    pub fn claim_if_new(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}
