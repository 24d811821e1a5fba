//! Health, readiness and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use habitat_protocol::{media_types, HealthResponse, ReadyResponse};

use crate::error::json_response;
use crate::state::AppState;

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /ready - Readiness check (the metadata table must load)
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let service = Arc::clone(&state.service);
    let loaded = tokio::task::spawn_blocking(move || service.list_layers()).await;

    match loaded {
        Ok(Ok(_)) => json_response(StatusCode::OK, media_types::JSON, &ReadyResponse::ready()),
        Ok(Err(e)) => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            media_types::JSON,
            &ReadyResponse::not_ready(e.to_string()),
        ),
        Err(e) => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            media_types::JSON,
            &ReadyResponse::not_ready(e.to_string()),
        ),
    }
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
