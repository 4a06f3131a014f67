// src/page/mod.rs
// =============================================================================
// This module turns fetched bytes into something we can query.
//
// Submodules:
// - links: resolves hrefs and decides which links the crawler follows
// - analyzer: pulls the content record (title, headings, ...) out of a page
//
// This file holds the document parser itself. We use the `scraper` crate,
// which parses HTML with html5ever and supports CSS selectors.
//
// Note: scraper's `Html` is not `Send`, so a `ParsedPage` must never be held
// across an `.await`. The engine does all page work in one synchronous step.
// =============================================================================

pub mod analyzer;
pub mod links;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::CrawlError;

pub use analyzer::{DefaultAnalyzer, PageAnalyzer};
pub use links::{extract_links, resolve_url, LinkScope};

// A parsed HTML document
pub struct ParsedPage {
    document: Html,
}

impl ParsedPage {
    // Parses a response body into a queryable page
    //
    // Parameters:
    //   body: raw response bytes
    //   content_type: the Content-Type header, if the server sent one
    //
    // Fails with a Parse error when the content type is not HTML or the body
    // is not valid UTF-8. html5ever itself never rejects markup.
    pub fn parse(body: &[u8], content_type: Option<&str>) -> Result<Self, CrawlError> {
        if let Some(content_type) = content_type {
            if !is_html_content_type(content_type) {
                return Err(CrawlError::parse(format!(
                    "unsupported content type '{}'",
                    content_type
                )));
            }
        }

        let html = std::str::from_utf8(body)
            .map_err(|e| CrawlError::parse(format!("body is not valid UTF-8: {}", e)))?;

        Ok(Self::from_html(html))
    }

    pub fn from_html(html: &str) -> Self {
        ParsedPage {
            document: Html::parse_document(html),
        }
    }

    /// Whitespace-normalized text of every element matching `css`.
    pub fn select_text(&self, css: &str) -> Vec<String> {
        match selector(css) {
            Some(sel) => self.document.select(&sel).map(element_text).collect(),
            None => Vec::new(),
        }
    }

    /// Text of the first element matching `css`.
    pub fn first_text(&self, css: &str) -> Option<String> {
        let sel = selector(css)?;
        self.document.select(&sel).next().map(element_text)
    }

    /// Value of `attr` on every element matching `css` that carries it.
    pub fn select_attr(&self, css: &str, attr: &str) -> Vec<String> {
        match selector(css) {
            Some(sel) => self
                .document
                .select(&sel)
                .filter_map(|el| el.value().attr(attr))
                .map(|value| value.to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    // Every table row in the document, as the text of its th/td cells.
    // Rows of all tables are flattened into one list.
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        let (Some(tables), Some(rows), Some(cells)) =
            (selector("table"), selector("tr"), selector("th, td"))
        else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for table in self.document.select(&tables) {
            for row in table.select(&rows) {
                out.push(row.select(&cells).map(element_text).collect());
            }
        }
        out
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || mime.contains("html")
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(css, error = %e, "invalid CSS selector");
            None
        }
    }
}

// Joins an element's text nodes and collapses runs of whitespace
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
