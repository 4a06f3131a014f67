// src/lib.rs
// =============================================================================
// page-harvester: a depth-bounded, concurrency-bounded web crawler.
//
// The binary in main.rs is a thin CLI over this library:
// - crawl:  the engine and its shared state
// - page:   HTML parsing, link extraction, content analysis
// - config: crawl settings (defaults, YAML file, flags)
// - report: CSV / JSON / table output of the results
// - logging: tracing subscriber setup
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod logging;
pub mod page;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::{CrawlEngine, CrawlOutcome, CrawlStats, ResultStore};
pub use error::CrawlError;
