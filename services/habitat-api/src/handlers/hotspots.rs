//! Hotspot table handler.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::Response};
use habitat_protocol::{media_types, HotspotsResponse};

use crate::error::{json_response, run_blocking};
use crate::state::AppState;

/// GET /hotspots - Pre-ranked highest-potential zones
pub async fn hotspots_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match run_blocking(&state, |service| service.hotspots()).await {
        Ok(rows) => json_response(StatusCode::OK, media_types::JSON, &HotspotsResponse::new(rows)),
        Err(response) => response,
    }
}
