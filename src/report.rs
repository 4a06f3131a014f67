// src/report.rs
// =============================================================================
// Output of a finished crawl.
//
// Three formats:
// - CSV file: one row per page, URL first, then the page's content record
// - JSON on stdout: the records plus the crawl stats
// - a human-readable table on stdout
//
// Records come from the page analyzer and vary in length (one column per
// heading/paragraph), so the CSV writer runs in flexible mode.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::crawl::{CrawlStats, ResultStore};

pub const CSV_HEADERS: [&str; 9] = [
    "URL",
    "Title",
    "Meta Description",
    "Meta Keywords",
    "Headings",
    "Paragraphs",
    "Image URLs",
    "External Links",
    "Table Data",
];

// Writes the store as CSV to `path`, replacing any existing file
pub fn write_csv(path: &Path, store: &ResultStore) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    write_csv_to(file, store).with_context(|| format!("cannot write {}", path.display()))
}

pub fn write_csv_to<W: Write>(out: W, store: &ResultStore) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
    writer.write_record(CSV_HEADERS)?;

    for (url, record) in store.snapshot() {
        let mut row = Vec::with_capacity(record.len() + 1);
        row.push(url);
        row.extend(record);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    stats: &'a CrawlStats,
    pages: BTreeMap<String, Vec<String>>,
}

pub fn to_json(store: &ResultStore, stats: &CrawlStats) -> Result<String> {
    let report = JsonReport {
        stats,
        pages: store.snapshot(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// Prints a one-line-per-page table and a summary
pub fn print_table(store: &ResultStore, stats: &CrawlStats) {
    println!("{:<60} {:<40}", "URL", "TITLE");
    println!("{}", "=".repeat(100));

    for (url, record) in store.snapshot() {
        let title = record.first().map(String::as_str).unwrap_or("");
        println!("{:<60} {:<40}", truncate(&url, 57), truncate(title, 37));
    }

    println!();
    println!("Summary:");
    println!("   Pages stored:    {}", store.len());
    println!("   Fetch failures:  {}", stats.fetch_failures);
    println!("   Parse failures:  {}", stats.parse_failures);
    println!("   Peak in flight:  {}", stats.peak_in_flight);
    if stats.cancelled {
        println!("   (crawl was interrupted; results are partial)");
    }
}

// Shortens `text` to `max` characters plus "..." if it is longer
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
