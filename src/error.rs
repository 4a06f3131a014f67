// src/error.rs
// =============================================================================
// Error taxonomy for the crawl engine.
//
// Only `Config` ever escapes a crawl run. Everything else is a per-URL
// problem: the engine logs it, counts it, and keeps crawling.
//
// - Config:  bad seed URL or bad settings (fatal, before any fetch)
// - Fetch:   transport failure or non-2xx status (branch ends)
// - Parse:   body is not a usable HTML document (branch ends)
// - Resolve: a single href could not be resolved (that link is skipped)
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("cannot resolve link '{href}': {reason}")]
    Resolve { href: String, reason: String },
}

impl CrawlError {
    pub fn config(reason: impl Into<String>) -> Self {
        CrawlError::Config(reason.into())
    }

    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        CrawlError::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    // The parser doesn't know which URL it is parsing; the engine attaches it
    // afterwards with `at_url`.
    pub fn parse(reason: impl Into<String>) -> Self {
        CrawlError::Parse {
            url: String::new(),
            reason: reason.into(),
        }
    }

    pub fn at_url(self, page_url: &str) -> Self {
        match self {
            CrawlError::Parse { reason, .. } => CrawlError::Parse {
                url: page_url.to_string(),
                reason,
            },
            other => other,
        }
    }
}
