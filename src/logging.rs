// src/logging.rs
// =============================================================================
// Logging setup.
//
// Everything the crawler reports goes through `tracing` and is written to
// stderr, so stdout stays clean for --json output. RUST_LOG works as usual;
// without it we log this crate at info (or debug with --verbose) and
// everything else at warn.
// =============================================================================

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(format!("warn,page_harvester={}", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {}", e))?;

    Ok(())
}
