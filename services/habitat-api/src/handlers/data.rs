//! Layer listing, layer read and habitat collection handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::Response,
};
use grid_processor::{HabitatCollection, HabitatExtraction, DEFAULT_MAX_POINTS};
use habitat_protocol::{
    media_types, CollectionMetadata, ExceptionResponse, FeatureCollection, HabitatFeature,
    HabitatProperties, LayersResponse,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{error_response, json_response, run_blocking};
use crate::handlers::query_rejection;
use crate::state::AppState;

/// Default habitat threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.1;
/// Default number of habitat features.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// GET /data/layers - All layers of the metadata table
pub async fn layers_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match run_blocking(&state, |service| service.list_layers()).await {
        Ok(table) => json_response(
            StatusCode::OK,
            media_types::JSON,
            &LayersResponse::new((*table).clone()),
        ),
        Err(response) => response,
    }
}

/// Query parameters for a layer read.
#[derive(Debug, Deserialize)]
pub struct LayerParams {
    /// Subsample large grids (default true).
    pub sample: Option<bool>,

    /// Point ceiling when sampling, in [100, 100000].
    pub max_points: Option<usize>,
}

/// GET /data/:layer_name - One layer as a JSON grid
pub async fn layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_name): Path<String>,
    params: Result<Query<LayerParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return query_rejection(rejection),
    };
    let sample = params.sample.unwrap_or(true);
    let max_points = params.max_points.unwrap_or(DEFAULT_MAX_POINTS);

    debug!(layer = %layer_name, sample, max_points, "Layer read");

    match run_blocking(&state, move |service| {
        service.read_layer(&layer_name, sample, max_points)
    })
    .await
    {
        Ok(data) => json_response(StatusCode::OK, media_types::JSON, &data),
        Err(response) => response,
    }
}

/// Query parameters for the habitat collection.
#[derive(Debug, Deserialize)]
pub struct HabitatParams {
    /// Minimum habitat index, in [0, 1] (default 0.1).
    pub threshold: Option<f64>,

    /// Feature cap (default 1000).
    pub max_features: Option<usize>,

    /// "geojson" (default) or "json"; only changes the content type.
    pub format: Option<String>,
}

/// GET /data/habitat - Habitat zones as a GeoJSON FeatureCollection
pub async fn habitat_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<HabitatParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return query_rejection(rejection),
    };

    let content_type = match params.format.as_deref().unwrap_or("geojson") {
        "geojson" => media_types::GEOJSON,
        "json" => media_types::JSON,
        other => {
            return error_response(
                StatusCode::BAD_REQUEST,
                ExceptionResponse::bad_request(format!(
                    "Unsupported format '{}'. Supported: geojson, json",
                    other
                )),
            )
        }
    };
    let threshold = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let max_features = params.max_features.unwrap_or(DEFAULT_MAX_FEATURES);

    let collection = match run_blocking(&state, move |service| {
        service.habitat(threshold, max_features)
    })
    .await
    {
        Ok(collection) => collection,
        Err(response) => return response,
    };

    match collection {
        HabitatCollection::Pregenerated(value) => {
            json_response(StatusCode::OK, content_type, &value)
        }
        HabitatCollection::Generated { extraction, source } => json_response(
            StatusCode::OK,
            content_type,
            &feature_collection(&extraction, &source),
        ),
    }
}

/// Convert extracted zones into a feature collection with metadata.
pub fn feature_collection(extraction: &HabitatExtraction, source: &str) -> FeatureCollection {
    let features: Vec<HabitatFeature> = extraction
        .zones
        .iter()
        .map(|zone| {
            HabitatFeature::polygon(
                zone.footprint.to_vec(),
                HabitatProperties {
                    h_index: zone.value,
                    latitude: zone.lat,
                    longitude: zone.lon,
                    habitat_potential: zone.potential.as_str().to_string(),
                    confidence: zone.confidence,
                },
            )
        })
        .collect();

    debug!(
        zones = features.len(),
        total_available = extraction.total_available,
        "Generated habitat collection"
    );

    let metadata = CollectionMetadata::new(
        features.len(),
        extraction.total_available,
        extraction.threshold,
        extraction.max_features,
        source,
    );
    FeatureCollection::new(features).with_metadata(metadata)
}
