// src/page/links.rs
// =============================================================================
// This module decides which links the crawler follows and turns them into
// absolute URLs.
//
// Two pieces:
// - extract_links: reads every <a href> on a page and keeps the ones that
//   fall inside the configured LinkScope
// - resolve_url: resolves a (possibly relative) href against the page URL
//   using RFC 3986 rules, via `Url::join`
//
// Both are pure functions with no shared state.
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use super::ParsedPage;
use crate::error::CrawlError;

// Which discovered links are considered part of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkScope {
    /// Follow only references that are not already absolute URLs.
    ///
    /// This never looks at the host, so a protocol-relative reference
    /// like `//other.example/page` is still followed.
    #[default]
    Relative,
    /// Follow any reference whose scheme, host and port match the page's.
    SameOrigin,
}

// Extracts the hrefs the crawler should follow from a page
//
// Parameters:
//   page: the parsed page
//   base: the page's own URL (only consulted for LinkScope::SameOrigin)
//   scope: which links count as internal
//
// Returns: the raw href values, in document order. The caller resolves them.
//
// Example (Relative scope):
//   <a href="/docs">, <a href="https://other.com">, <a href="#top">
//   result = ["/docs"]
pub fn extract_links(page: &ParsedPage, base: &Url, scope: LinkScope) -> Vec<String> {
    page.select_attr("a[href]", "href")
        .into_iter()
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .filter(|href| match scope {
            LinkScope::Relative => !is_absolute(href),
            LinkScope::SameOrigin => resolve_url(base, href)
                .map(|url| is_web_scheme(&url) && url.origin() == base.origin())
                .unwrap_or(false),
        })
        .collect()
}

// Resolves a possibly-relative href to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> https://example.com/docs
//   href = "../other"           -> https://example.com/other
//   href = "https://other.com"  -> https://other.com/
//   href = "http://[::1"        -> Err(Resolve)
pub fn resolve_url(base: &Url, href: &str) -> Result<Url, CrawlError> {
    base.join(href).map_err(|e| CrawlError::Resolve {
        href: href.to_string(),
        reason: e.to_string(),
    })
}

// An href is absolute when it parses on its own, i.e. it carries a scheme
fn is_absolute(href: &str) -> bool {
    Url::parse(href).is_ok()
}

pub(crate) fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
