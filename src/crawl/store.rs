// src/crawl/store.rs
// =============================================================================
// Where crawled pages end up: a map from URL to its content record.
//
// The store is a cheap handle (an Arc around a DashMap). Workers share it
// while the crawl runs, and the same handle is handed back to the caller
// when the crawl finishes. Nothing outside this file touches the map
// directly; writes go through `append_record`, reads through the
// copying accessors below.
// =============================================================================

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    records: Arc<DashMap<String, Vec<String>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends `record` to the sequence stored for `url`, creating it if absent
    //
    // The shard lock for `url` is held only for the extend itself, so appends
    // to the same URL are serialized and appends to other URLs mostly aren't.
    pub fn append_record(&self, url: &str, record: Vec<String>) {
        self.records
            .entry(url.to_string())
            .or_default()
            .extend(record);
    }

    pub fn get(&self, url: &str) -> Option<Vec<String>> {
        self.records.get(url).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of every record, sorted by URL.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
