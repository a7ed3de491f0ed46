//! Status handler: what this instance will accept.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::AppState;
use crate::search_params::SearchLimits;

#[derive(Serialize)]
pub(super) struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub generator: &'static str,
    pub limits: SearchLimits,
}

pub(super) async fn handler_api_status(
    State(state): State<Arc<AppState>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        generator: state.config.search.generator.name(),
        limits: state.config.limits.clone(),
    })
}
