//! # Search — Consecutive-Prime-Sum Orchestration
//!
//! Ties prime generation to the window search. For a validated request:
//!
//! 1. Generate every prime in [2, end] once.
//! 2. For each prime P ≥ start, find the consecutive runs of the *full*
//!    sequence summing to P. Primes below `start` stay eligible as summands
//!    even though they are never targets.
//! 3. Keep all runs for P if their count lies within
//!    [min_sequences, max_sequences], otherwise drop every run for P.
//!
//! Results come out by ascending target, then run length, then start index.
//! A call is synchronous and allocates its own sequence, so concurrent calls
//! share nothing.
//!
//! `run_search_until` checks a deadline before each target and gives up with
//! `SearchError::DeadlineExceeded` once it has passed. The HTTP service uses it
//! so an abandoned request stops consuming a blocking-pool thread.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::consecutive::find_consecutive_sums;
use crate::search_params::{SearchLimits, SearchParams, SearchRequest, ValidationError};
use crate::sieve::PrimeGenerator;

/// One target prime paired with one run of consecutive primes summing to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub sum: u64,
    pub sequence: Vec<u64>,
}

/// Wire envelope for a successful search: `{"results": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Rejected parameters. Never retried; the reason goes back to the caller.
    InvalidInput(ValidationError),
    /// The deadline passed before every target was searched.
    DeadlineExceeded,
    /// Unexpected failure while computing.
    Internal(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidInput(e) => write!(f, "{}", e),
            SearchError::DeadlineExceeded => f.write_str("search exceeded the request deadline"),
            SearchError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<ValidationError> for SearchError {
    fn from(e: ValidationError) -> Self {
        SearchError::InvalidInput(e)
    }
}

/// Run a validated search to completion.
pub fn run_search(params: &SearchParams, generator: PrimeGenerator) -> Vec<SearchResult> {
    let primes = generator.generate(2, params.end);
    search_targets(params, generator, &primes, None).unwrap_or_default()
}

/// Run a validated search, abandoning it once `deadline` has passed.
pub fn run_search_until(
    params: &SearchParams,
    generator: PrimeGenerator,
    deadline: Instant,
) -> Result<Vec<SearchResult>, SearchError> {
    let primes = generator.generate(2, params.end);
    search_targets(params, generator, &primes, Some(deadline))
}

fn search_targets(
    params: &SearchParams,
    generator: PrimeGenerator,
    primes: &[u64],
    deadline: Option<Instant>,
) -> Result<Vec<SearchResult>, SearchError> {
    let first_target = primes.partition_point(|&p| p < params.start);

    let mut results = Vec::new();
    let mut targets_kept = 0usize;
    for (searched, &target) in primes[first_target..].iter().enumerate() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            debug!(
                targets_searched = searched,
                results = results.len(),
                %generator,
                "search deadline exceeded"
            );
            return Err(SearchError::DeadlineExceeded);
        }
        let runs = find_consecutive_sums(primes, target, params.min_length, params.max_length);
        if !params.admits_count(runs.len()) {
            continue;
        }
        targets_kept += 1;
        results.extend(runs.into_iter().map(|run| SearchResult {
            sum: target,
            sequence: run.primes(primes).to_vec(),
        }));
    }

    debug!(
        primes = primes.len(),
        targets = primes.len() - first_target,
        targets_kept,
        results = results.len(),
        %generator,
        "search complete"
    );
    Ok(results)
}

/// Validate a raw request against `limits` and run it.
pub fn execute(
    request: &SearchRequest,
    limits: &SearchLimits,
    generator: PrimeGenerator,
) -> Result<Vec<SearchResult>, SearchError> {
    let params = request.validate(limits)?;
    Ok(run_search(&params, generator))
}

/// Like `execute`, but gives up with `DeadlineExceeded` after `deadline`.
pub fn execute_until(
    request: &SearchRequest,
    limits: &SearchLimits,
    generator: PrimeGenerator,
    deadline: Instant,
) -> Result<Vec<SearchResult>, SearchError> {
    let params = request.validate(limits)?;
    run_search_until(&params, generator, deadline)
}
