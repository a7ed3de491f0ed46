//! Search endpoint: `POST /api/search`.
//!
//! The body is read as raw bytes so malformed JSON yields the same
//! `{"error": ...}` shape as a validation failure. The computation itself runs
//! on the blocking pool; it is CPU-bound and never yields, so it carries the
//! request deadline and stops on its own once that passes (408).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::AppState;
use crate::search::{self, SearchError, SearchResponse};
use crate::search_params::SearchRequest;

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match self {
            SearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SearchError::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
            SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

pub(super) async fn handler_api_search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let request = match SearchRequest::from_json(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "rejected search request body");
            state.prom_metrics.record_search("invalid");
            return SearchError::from(e).into_response();
        }
    };

    let limits = state.config.limits.clone();
    let generator = state.config.search.generator;
    let started = Instant::now();
    let deadline = started + Duration::from_secs(state.config.server.request_timeout_secs);
    let outcome = tokio::task::spawn_blocking(move || {
        search::execute_until(&request, &limits, generator, deadline)
            .map(|results| (request, results))
    })
    .await
    .unwrap_or_else(|e| Err(SearchError::Internal(format!("search task failed: {}", e))));

    match outcome {
        Ok((request, results)) => {
            let elapsed = started.elapsed();
            state.prom_metrics.record_search("ok");
            state.prom_metrics.results_returned.inc_by(results.len() as u64);
            state
                .prom_metrics
                .search_duration
                .observe(elapsed.as_secs_f64());
            info!(
                start = request.start,
                end = request.end,
                min_length = request.min_length,
                max_length = request.max_length,
                results = results.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "search served"
            );
            Json(SearchResponse { results }).into_response()
        }
        Err(e @ SearchError::InvalidInput(_)) => {
            warn!(error = %e, "rejected search request");
            state.prom_metrics.record_search("invalid");
            e.into_response()
        }
        Err(e @ SearchError::DeadlineExceeded) => {
            warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search abandoned at deadline"
            );
            state.prom_metrics.record_search("timeout");
            e.into_response()
        }
        Err(e @ SearchError::Internal(_)) => {
            error!(error = %e, "search failed");
            state.prom_metrics.record_search("error");
            e.into_response()
        }
    }
}
