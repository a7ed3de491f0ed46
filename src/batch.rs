//! # Batch — Many Independent Searches From One File
//!
//! A batch file is TOML with one `[[search]]` table per request; each table
//! takes the same fields (and defaults) as the HTTP body:
//!
//! ```toml
//! [[search]]
//! end = 50
//! max_length = 6
//!
//! [[search]]
//! start = 100
//! end = 1000
//! min_sequences = 2
//! ```
//!
//! Requests run in parallel on the global rayon pool. Each one is computed
//! single-threaded over its own prime sequence, so they share no state.
//! Outcomes are returned in file order; an invalid request yields an error
//! entry without affecting the others.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::search::{self, SearchResult};
use crate::search_params::{SearchLimits, SearchRequest};
use crate::sieve::PrimeGenerator;

#[derive(Debug, Clone, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub search: Vec<SearchRequest>,
}

/// Result of one batch entry: `results` on success, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn parse_batch(content: &str) -> Result<BatchFile> {
    toml::from_str(content).context("invalid batch file")
}

pub fn parse_batch_file(path: &Path) -> Result<BatchFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    parse_batch(&content).with_context(|| format!("in batch file {}", path.display()))
}

pub fn run_batch(
    requests: &[SearchRequest],
    limits: &SearchLimits,
    generator: PrimeGenerator,
) -> Vec<BatchOutcome> {
    requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| match search::execute(request, limits, generator) {
            Ok(results) => BatchOutcome {
                index,
                results: Some(results),
                error: None,
            },
            Err(e) => BatchOutcome {
                index,
                results: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}
