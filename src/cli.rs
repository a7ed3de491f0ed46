//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the execution
//! logic for the `search` and `batch` subcommands and rayon configuration.

use anyhow::Result;
use primesum::config::ServiceConfig;
use primesum::{batch, search, SearchRequest, SearchResponse};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Run one search and print `{"results": [...]}` to stdout.
pub fn run_search(config: &ServiceConfig, request: &SearchRequest, pretty: bool) -> Result<()> {
    let started = Instant::now();
    let results = search::execute(request, &config.limits, config.search.generator)?;
    info!(
        start = request.start,
        end = request.end,
        results = results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        generator = %config.search.generator,
        "search complete"
    );
    print_json(&SearchResponse { results }, pretty)
}

/// Run a TOML batch file and print one outcome per `[[search]]` table.
pub fn run_batch(config: &ServiceConfig, file: &Path, pretty: bool) -> Result<()> {
    let batch_file = batch::parse_batch_file(file)?;
    let started = Instant::now();
    let outcomes = batch::run_batch(&batch_file.search, &config.limits, config.search.generator);
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(
        searches = outcomes.len(),
        failed,
        threads = rayon::current_num_threads(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch complete"
    );
    if failed > 0 {
        warn!(failed, "some batch entries were rejected");
    }
    print_json(&outcomes, pretty)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
