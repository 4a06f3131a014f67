// src/page/analyzer.rs
// =============================================================================
// Page analyzers produce the content record stored for every crawled page.
//
// The crawl engine doesn't care what a record contains beyond "an ordered
// list of strings", so analysis is a trait. DefaultAnalyzer extracts the
// fields the CSV report expects, in this order:
//
//   title, meta description, meta keywords, headings..., paragraphs...,
//   image URLs, external links, table data
//
// "External" is relative to the crawl's base URL, not to the page, since a
// crawl can wander onto another host through protocol-relative links.
// =============================================================================

use url::Url;

use super::links::{is_web_scheme, resolve_url};
use super::ParsedPage;

/// Produces a content record for one page. `base` is the URL the crawl
/// started from, `url` the page being analyzed.
pub trait PageAnalyzer: Send + Sync {
    fn analyze(&self, base: &Url, url: &Url, page: &ParsedPage) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultAnalyzer;

impl PageAnalyzer for DefaultAnalyzer {
    fn analyze(&self, base: &Url, url: &Url, page: &ParsedPage) -> Vec<String> {
        let mut record = Vec::new();

        record.push(page.first_text("title").unwrap_or_default());
        record.push(meta_content(page, "description"));
        record.push(meta_content(page, "keywords"));
        record.extend(page.select_text("h1, h2, h3"));
        record.extend(page.select_text("p"));
        record.push(image_urls(url, page).join(","));
        record.push(external_links(base, page).join(","));
        record.push(table_data(page));

        record
    }
}

fn meta_content(page: &ParsedPage, name: &str) -> String {
    page.select_attr(&format!("meta[name='{}']", name), "content")
        .into_iter()
        .next()
        .unwrap_or_default()
}

// Image sources, made absolute against the page URL. Sources that can't be
// resolved are dropped.
fn image_urls(url: &Url, page: &ParsedPage) -> Vec<String> {
    page.select_attr("img[src]", "src")
        .iter()
        .filter_map(|src| resolve_url(url, src).ok())
        .map(|u| u.to_string())
        .collect()
}

// Absolute http(s) links pointing at a different host than the base
fn external_links(base: &Url, page: &ParsedPage) -> Vec<String> {
    page.select_attr("a[href]", "href")
        .into_iter()
        .filter(|href| match Url::parse(href) {
            Ok(target) => is_web_scheme(&target) && target.host_str() != base.host_str(),
            Err(_) => false,
        })
        .collect()
}

fn table_data(page: &ParsedPage) -> String {
    // A Vec<Vec<String>> always serializes
    serde_json::to_string(&page.table_rows()).unwrap_or_default()
}
