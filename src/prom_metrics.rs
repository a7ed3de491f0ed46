//! # Prometheus Metrics — Exposition for Container Orchestration
//!
//! Exposes primesum operational metrics in the Prometheus text exposition
//! format for scraping by Prometheus or any OpenMetrics-compatible collector.
//!
//! ## Metrics Exposed
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `primesum_searches_total` | Counter | `outcome` | Searches by outcome |
//! | `primesum_results_returned_total` | Counter | | Result entries returned |
//! | `primesum_search_duration_seconds` | Histogram | | Compute time of successful searches |
//! | `primesum_http_request_duration_seconds` | Histogram | `method`, `path` | HTTP latency |
//!
//! Search outcomes are `ok`, `invalid`, `timeout` and `error`.
//!
//! The `/metrics` endpoint renders the current registry state on each scrape.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Label set for search outcomes.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct OutcomeLabel {
    pub outcome: String,
}

/// Label set for HTTP request latency.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

/// Thread-safe metrics registry for the search service.
pub struct Metrics {
    pub registry: Registry,
    pub searches: Family<OutcomeLabel, Counter>,
    pub results_returned: Counter,
    pub search_duration: Histogram,
    pub http_request_duration: Family<HttpLabel, Histogram>,
}

impl Metrics {
    /// Create a new registry with all primesum metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let searches = Family::<OutcomeLabel, Counter>::default();
        registry.register(
            "primesum_searches",
            "Searches handled, by outcome",
            searches.clone(),
        );

        let results_returned = Counter::default();
        registry.register(
            "primesum_results_returned",
            "Result entries returned to clients",
            results_returned.clone(),
        );

        // 1 ms .. ~32 s
        let search_duration = Histogram::new(exponential_buckets(0.001, 2.0, 16));
        registry.register(
            "primesum_search_duration_seconds",
            "Wall-clock time spent computing successful searches",
            search_duration.clone(),
        );

        let http_request_duration = Family::<HttpLabel, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 16))
        });
        registry.register(
            "primesum_http_request_duration_seconds",
            "HTTP request latency by method and path",
            http_request_duration.clone(),
        );

        Self {
            registry,
            searches,
            results_returned,
            search_duration,
            http_request_duration,
        }
    }

    /// Count one search with the given outcome label.
    pub fn record_search(&self, outcome: &str) {
        self.searches
            .get_or_create(&OutcomeLabel {
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        // Writing into a String cannot fail.
        let _ = encode(&mut buf, &self.registry);
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
