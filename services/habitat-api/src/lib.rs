//! Habitat API Service Library
//!
//! HTTP layer over [`grid_processor::GridDataService`]. Handlers run the
//! synchronous core on the blocking pool and translate its errors into
//! status codes and JSON exception bodies.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::state::AppState;

/// Build the API router with its state attached.
///
/// Transport middleware (CORS, tracing, compression) is added by the binary.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Landing page
        .route("/", get(handlers::landing::root_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Data layers
        .route("/data/layers", get(handlers::data::layers_handler))
        .route("/data/habitat", get(handlers::data::habitat_handler))
        .route("/data/:layer_name", get(handlers::data::layer_handler))
        // Point queries and derived products
        .route("/predict", get(handlers::predict::predict_handler))
        .route("/hotspots", get(handlers::hotspots::hotspots_handler))
        .route("/meta", get(handlers::predict::meta_handler))
        .layer(Extension(state))
}
