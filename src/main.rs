// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Build the crawl config (defaults <- config file <- flags)
// 4. Run the crawl until it finishes or Ctrl-C is pressed
// 5. Write the CSV and print the results
// 6. Exit with proper code (0 = crawl completed, 2 = error)
//
// Individual pages failing to load do not change the exit code; they are
// logged and left out of the results.
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use tracing::{error, info, warn};

use page_harvester::{config, logging, report, CrawlEngine};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // The logger may not be up yet, so stderr directly as well
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    let settings = config::resolve(args.config.as_deref(), &args.overrides())?;
    let engine = CrawlEngine::new(settings)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let outcome = engine.run_until(&args.url, shutdown).await?;

    report::write_csv(&args.output, &outcome.store)?;
    info!("Results saved to {}", args.output.display());

    if args.json {
        println!("{}", report::to_json(&outcome.store, &outcome.stats)?);
    } else {
        report::print_table(&outcome.store, &outcome.stats);
    }

    Ok(0)
}
