// src/crawl/fetch.rs
// =============================================================================
// This module downloads pages.
//
// The engine only talks to the `Fetcher` trait, so tests can swap the
// network out for an in-memory site. HttpFetcher is the real thing:
// - one reqwest Client for the whole crawl (connection pooling)
// - sends the configured User-Agent on every request
// - follows a limited number of redirects
// - treats any non-2xx status as a failed fetch
//
// Failures are categorized into readable reasons (timeout, connection,
// redirect loop, HTTP status) so the crawl log says what went wrong.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::CrawlError;

// What came back from a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the shared HTTP client
    //
    // Parameters:
    //   user_agent: sent as the User-Agent header on every request
    //   timeout: per-request timeout (connect + transfer)
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| CrawlError::config(format!("cannot build HTTP client: {}", e)))?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CrawlError::fetch(url.as_str(), describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::fetch(
                url.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| CrawlError::fetch(url.as_str(), describe_error(&e)))?;

        Ok(FetchedPage {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

// Turns a reqwest error into a short reason for the log
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure or refused connection
// - Too many redirects
// - Body decoding problems
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_body() || error.is_decode() {
        format!("could not read body: {}", error)
    } else {
        error.to_string()
    }
}
