//! Error translation at the HTTP boundary.

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use grid_common::{GridError, GridResult};
use grid_processor::GridDataService;
use habitat_protocol::{media_types, ExceptionResponse};
use metrics::counter;
use serde::Serialize;
use tracing::{debug, error};

use crate::state::AppState;

/// Serialize `body` as JSON with the given status and content type.
pub fn json_response<T: Serialize>(status: StatusCode, content_type: &'static str, body: &T) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (status, [(header::CONTENT_TYPE, content_type)], json).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ExceptionResponse::internal_error("Failed to serialize response"),
            )
        }
    }
}

pub fn error_response(status: StatusCode, exc: ExceptionResponse) -> Response {
    let json = serde_json::to_string(&exc).unwrap_or_default();
    (status, [(header::CONTENT_TYPE, media_types::JSON)], json).into_response()
}

/// Map a core error to its response. Server errors are logged at error
/// level, client errors at debug.
pub fn grid_error_response(err: &GridError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_client_error() {
        debug!(code = err.error_code(), error = %err, "Request rejected");
    } else {
        error!(code = err.error_code(), error = %err, "Request failed");
    }
    counter!("api_errors_total", "code" => err.error_code()).increment(1);

    let title = status.canonical_reason().unwrap_or("Error");
    error_response(
        status,
        ExceptionResponse::new(err.error_code(), status.as_u16(), err.to_string()).with_title(title),
    )
}

/// Run a service call on the blocking pool.
///
/// Core errors are translated with [`grid_error_response`]; a panicked or
/// cancelled task is a 500.
pub async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&GridDataService) -> GridResult<T> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    match tokio::task::spawn_blocking(move || f(&service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(grid_error_response(&err)),
        Err(e) => {
            error!(error = %e, "Blocking task failed");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ExceptionResponse::internal_error("Request processing failed"),
            ))
        }
    }
}
