//! HTTP request handlers for the habitat API.

pub mod data;
pub mod health;
pub mod hotspots;
pub mod landing;
pub mod predict;

use axum::{extract::rejection::QueryRejection, http::StatusCode, response::Response};
use habitat_protocol::ExceptionResponse;

use crate::error::error_response;

/// Turn a query-string rejection into a JSON 400.
pub(crate) fn query_rejection(rejection: QueryRejection) -> Response {
    tracing::debug!(error = %rejection, "Invalid query string");
    error_response(
        StatusCode::BAD_REQUEST,
        ExceptionResponse::bad_request(format!("Invalid query parameters: {}", rejection.body_text())),
    )
}
