//! Point query and habitat extent handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::Response,
};
use habitat_protocol::{media_types, ExceptionResponse};
use serde::Deserialize;

use crate::error::{error_response, json_response, run_blocking};
use crate::handlers::query_rejection;
use crate::state::AppState;

/// Query parameters for the predict endpoint.
#[derive(Debug, Deserialize)]
pub struct PredictParams {
    /// Latitude in degrees. Required parameter.
    pub lat: Option<f64>,

    /// Longitude in degrees. Required parameter.
    pub lon: Option<f64>,
}

/// GET /predict?lat=..&lon=.. - Habitat index at the nearest grid cell
pub async fn predict_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<PredictParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return query_rejection(rejection),
    };

    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ExceptionResponse::bad_request("Missing required parameters: lat and lon"),
        );
    };

    match run_blocking(&state, move |service| service.predict(lat, lon)).await {
        Ok(result) => json_response(StatusCode::OK, media_types::JSON, &result),
        Err(response) => response,
    }
}

/// GET /meta - Size and range of the habitat grid axes
pub async fn meta_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match run_blocking(&state, |service| service.habitat_extent()).await {
        Ok(extent) => json_response(StatusCode::OK, media_types::JSON, &extent),
        Err(response) => response,
    }
}
