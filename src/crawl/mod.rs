// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-limited traversal starting from a seed URL
// - A fixed pool of workers sharing one work queue (the frontier)
// - At most `max_concurrency` fetches in flight at any moment
// - Every URL fetched at most once per run, even when many pages link to it
// - Optional delay before each discovered page is fetched
//
// Submodules:
// - engine: drives a crawl from seed to completion
// - frontier: work queue + outstanding-task counter
// - limiter: bounds concurrent fetches
// - visited: which URLs have been claimed
// - store: the content record for each crawled URL
// - fetch: the HTTP side
// =============================================================================

pub mod engine;
pub mod fetch;
pub mod frontier;
pub mod limiter;
pub mod store;
pub mod visited;

// Re-export the main types so callers can write `crawl::CrawlEngine`
pub use engine::{CrawlEngine, CrawlOutcome, CrawlStats};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use frontier::CrawlTask;
pub use store::ResultStore;
pub use visited::VisitedSet;
