pub mod batch;
pub mod config;
pub mod consecutive;
pub mod dashboard;
pub mod prom_metrics;
pub mod search;
pub mod search_params;
pub mod sieve;

pub use consecutive::{find_consecutive_sums, ConsecutiveRun};
pub use search::{
    execute, execute_until, run_search, run_search_until, SearchError, SearchResponse,
    SearchResult,
};
pub use search_params::{MaxSequences, SearchLimits, SearchParams, SearchRequest, ValidationError};
pub use sieve::{generate_primes, is_prime, PrimeGenerator};
