//! Shared test helpers for integration tests.

#![allow(dead_code)]

use primesum::config::ServiceConfig;

/// Build an Axum test router with the default configuration.
pub fn build_test_app() -> axum::Router {
    build_test_app_with(ServiceConfig::default())
}

/// Build an Axum test router with a custom configuration.
pub fn build_test_app_with(config: ServiceConfig) -> axum::Router {
    let state = primesum::dashboard::AppState::new(config);
    primesum::dashboard::build_router(state)
}

/// Brute-force reference: every contiguous run of `primes` with length in
/// [min_len, max_len] summing to `target`, resumming each window from scratch.
pub fn naive_consecutive_sums(
    primes: &[u64],
    target: u64,
    min_len: usize,
    max_len: usize,
) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    for len in min_len.max(1)..=max_len.min(primes.len()) {
        for start in 0..=primes.len() - len {
            if primes[start..start + len].iter().sum::<u64>() == target {
                runs.push((start, len));
            }
        }
    }
    runs
}
