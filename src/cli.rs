// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes. Crawl settings are all optional here: a flag
// that isn't given leaves the value from the config file (or the default)
// in place.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use page_harvester::config::ConfigOverrides;
use page_harvester::page::LinkScope;

#[derive(Parser, Debug)]
#[command(
    name = "page-harvester",
    version,
    about = "Crawl a website to a fixed depth and export what each page contains",
    long_about = "page-harvester starts from one URL, follows the site's own links up to a \
                  maximum depth with a bounded number of parallel requests, and writes the \
                  title, meta tags, headings, paragraphs, images, external links and tables \
                  of every page it reaches to a CSV file."
)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website starting from a URL
    ///
    /// Example: page-harvester crawl https://example.com --max-depth 2
    Crawl(CrawlArgs),
}

#[derive(clap::Args, Debug)]
pub struct CrawlArgs {
    /// Seed URL to start crawling from (http or https)
    pub url: String,

    /// Maximum crawl depth (default: 3)
    ///
    /// The seed is depth 0 and is always fetched. Links are followed while
    /// their depth stays below this value.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum number of pages fetched at the same time (default: 10)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Delay in milliseconds before each discovered page is fetched (default: 500)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Follow any link on the same scheme/host/port, not only relative links
    #[arg(long)]
    pub same_origin: bool,

    /// YAML file with crawl settings; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV file to write the results to
    #[arg(long, short, value_name = "FILE", default_value = "crawl_results.csv")]
    pub output: PathBuf,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_depth: self.max_depth,
            max_concurrency: self.max_concurrency,
            delay_ms: self.delay_ms,
            user_agent: self.user_agent.clone(),
            timeout_secs: self.timeout_secs,
            link_scope: self.same_origin.then_some(LinkScope::SameOrigin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_crawl_flags_become_overrides() {
        let cli = Cli::parse_from([
            "page-harvester",
            "crawl",
            "http://a.test/",
            "--max-depth",
            "2",
            "--same-origin",
        ]);
        let Commands::Crawl(args) = cli.command;

        let overrides = args.overrides();
        assert_eq!(overrides.max_depth, Some(2));
        assert_eq!(overrides.max_concurrency, None);
        assert_eq!(overrides.link_scope, Some(LinkScope::SameOrigin));
        assert_eq!(args.output, PathBuf::from("crawl_results.csv"));
    }
}
