//! # Dashboard — HTTP Search Service
//!
//! Runs an Axum HTTP server in front of the consecutive-prime-sum search.
//! `AppState` is the single service instance: it is built once in `run` (or by
//! a test), handed to the router, and reaches handlers through `State`. There
//! is no process-wide service handle.
//!
//! ## Routes
//!
//! | Endpoint | Purpose |
//! |----------|---------|
//! | `POST /api/search` | Run a search, `{"results": [...]}` |
//! | `GET /api/status` | Service version, limits and generator |
//! | `GET /healthz` | Liveness probe |
//! | `GET /metrics` | Prometheus scraping endpoint |
//!
//! ## Middleware
//!
//! Outermost first: request timeout (408), request body limit, HTTP tracing,
//! metrics + request-id, panic catching (500), CORS (any origin; GET, POST and
//! OPTIONS; `Content-Type`).

mod routes_health;
mod routes_search;
mod routes_status;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Instrument};

use crate::config::ServiceConfig;
use crate::prom_metrics;

pub struct AppState {
    pub config: ServiceConfig,
    pub prom_metrics: prom_metrics::Metrics,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Arc<Self> {
        Arc::new(AppState {
            config,
            prom_metrics: prom_metrics::Metrics::new(),
        })
    }
}

/// Paths recorded verbatim in the latency histogram; anything else is
/// bucketed as "other" so scanners cannot explode label cardinality.
const KNOWN_PATHS: [&str; 4] = ["/api/search", "/api/status", "/healthz", "/metrics"];

fn normalize_path(path: &str) -> &'static str {
    KNOWN_PATHS
        .iter()
        .copied()
        .find(|known| *known == path)
        .unwrap_or("other")
}

/// Middleware that records HTTP request duration into the Prometheus histogram,
/// generates (or propagates) a request ID for correlation, and wraps the
/// request in a tracing span using `.instrument()` for proper async propagation.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let raw_path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %raw_path,
    );
    let mut response = next.run(req).instrument(span).await;

    state
        .prom_metrics
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel {
            method,
            path: normalize_path(&raw_path).to_string(),
        })
        .observe(start.elapsed().as_secs_f64());

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_secs);

    Router::new()
        .route("/api/search", post(routes_search::handler_api_search))
        .route("/api/status", get(routes_status::handler_api_status))
        .route("/healthz", get(routes_health::handler_healthz))
        .route("/metrics", get(routes_health::handler_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(CatchPanicLayer::new())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}

/// Bind and serve until the process receives Ctrl-C.
pub async fn run(config: ServiceConfig) -> Result<()> {
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    info!(
        addr = %addr,
        max_end = config.limits.max_end,
        generator = %config.search.generator,
        "starting search service"
    );
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
