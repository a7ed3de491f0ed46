//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the search core and the HTTP service.
//!
//! ## Subcommands
//!
//! - `search`: run one search and print `{"results": [...]}` as JSON.
//! - `batch`: run every `[[search]]` table of a TOML file in parallel.
//! - `serve`: start the HTTP search service.
//!
//! ## Global Options
//!
//! - `--config` / `PRIMESUM_CONFIG`: TOML service configuration.
//! - `--threads`: Rayon thread pool size for `batch` (default: all cores).
//!
//! Logging goes to stderr; `LOG_FORMAT=json` switches to JSON lines and
//! `RUST_LOG` sets the filter (default `info`).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use primesum::{MaxSequences, PrimeGenerator};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primesum",
    version,
    about = "Find primes that are sums of consecutive primes"
)]
struct Cli {
    /// Path to a TOML service configuration file
    #[arg(long, env = "PRIMESUM_CONFIG")]
    config: Option<PathBuf>,

    /// Number of rayon worker threads for batch runs (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Prime generator (overrides [search] generator from the config file)
    #[arg(long, value_enum, global = true)]
    generator: Option<PrimeGenerator>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find primes in [start, end] expressible as sums of consecutive primes
    Search {
        /// Smallest target prime
        #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
        start: i64,
        /// Largest target prime (also the largest summand)
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        end: i64,
        /// Minimum number of consecutive primes in a run
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        min_length: i64,
        /// Maximum number of consecutive primes in a run
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        max_length: i64,
        /// Keep a target only if it has at least this many runs
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        min_sequences: i64,
        /// Keep a target only if it has at most this many runs ("unlimited" for no bound)
        #[arg(long, default_value = "unlimited", allow_negative_numbers = true)]
        max_sequences: MaxSequences,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Run every [[search]] table of a TOML batch file
    Batch {
        /// Path to the TOML batch file
        #[arg(long)]
        file: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Launch the HTTP search service
    Serve {
        /// Address to bind (overrides [server] bind)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides [server] port)
        #[arg(long, env = "PRIMESUM_PORT")]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for K8s, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let mut config = primesum::config::load(cli.config.as_deref())?;
    if let Some(generator) = cli.generator {
        config.search.generator = generator;
    }

    match &cli.command {
        Commands::Search {
            start,
            end,
            min_length,
            max_length,
            min_sequences,
            max_sequences,
            pretty,
        } => {
            let request = primesum::SearchRequest {
                start: *start,
                end: *end,
                min_sequences: *min_sequences,
                max_sequences: *max_sequences,
                min_length: *min_length,
                max_length: *max_length,
            };
            cli::run_search(&config, &request, *pretty)
        }
        Commands::Batch { file, pretty } => {
            cli::configure_rayon(cli.threads);
            cli::run_batch(&config, file, *pretty)
        }
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            primesum::config::validate_config(&config)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(primesum::dashboard::run(config))
        }
    }
}
