//! End-to-end tests for the habitat API router.
//!
//! Requests go through the real router; grids come from an in-memory
//! counting source over a temporary data directory.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use grid_processor::{GridDataService, GridProcessorConfig};
use storage::Catalog;
use test_utils::{
    create_axis, create_habitat_values, files, habitat_grid, CountingGridSource, TestDataDir,
    HABITAT_GEOJSON,
};
use tower::ServiceExt;

use habitat_api::build_router;
use habitat_api::state::AppState;

// ============================================================================
// Setup
// ============================================================================

struct TestApp {
    dir: TestDataDir,
    source: Arc<CountingGridSource>,
    router: Router,
}

/// Habitat layer over lat [-36, -26.25] and lon [149, 161.25] at 0.25
/// degrees, index rising from 0 to 1 in row-major order.
fn setup() -> TestApp {
    let dir = TestDataDir::with_defaults();
    let source = Arc::new(CountingGridSource::new().with_grid(
        "habitat_index_H.nc",
        habitat_grid(
            create_axis(-36.0, 0.25, 40),
            create_axis(149.0, 0.25, 50),
            create_habitat_values(40, 50),
        ),
    ));

    let catalog = Arc::new(Catalog::from_file(dir.data_directory(), files::METADATA));
    let service = GridDataService::with_parts(
        GridProcessorConfig::default(),
        dir.data_directory(),
        catalog,
        source.clone(),
    );
    let router = build_router(Arc::new(AppState::with_service(service)));

    TestApp {
        dir,
        source,
        router,
    }
}

async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// ============================================================================
// Service endpoints
// ============================================================================

#[tokio::test]
async fn test_root_lists_layers() {
    let app = setup();
    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["available_layers"],
        serde_json::json!(["habitat_index_H", "sst_celsius"])
    );
    assert!(body["endpoints"]["/data/habitat"].is_string());
    assert_eq!(body["data_directory"], app.dir.path().display().to_string());
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = setup();
    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let response = get(&app.router, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_not_ready_without_metadata() {
    let app = setup();
    app.dir.remove(files::METADATA);

    let response = get(&app.router, "/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "not_ready");

    // The landing page stays up with an empty layer list.
    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["available_layers"], serde_json::json!([]));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = setup();
    let response = get(&app.router, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));
}

// ============================================================================
// Layers
// ============================================================================

#[tokio::test]
async fn test_layers_listing() {
    let app = setup();
    let response = get(&app.router, "/data/layers").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["layers"]["sst_celsius"]["filename"], "sst_celsius.nc");
    assert_eq!(body["layers"]["sst_celsius"]["source"], "MODIS-Aqua L3");
    assert_eq!(body["layers"]["habitat_index_H"]["size_MB"], 1.5);
}

#[tokio::test]
async fn test_layer_read() {
    let app = setup();
    let response = get(&app.router, "/data/habitat_index_H?sample=true&max_points=500").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // 2000 cells over 500 points: factor 2
    assert_eq!(body["sampling_factor"], 2);
    assert_eq!(body["shape"], serde_json::json!([20, 25]));
    assert_eq!(body["lat"].as_array().unwrap().len(), 20);
    assert_eq!(body["variable"], "H_index");
    assert_eq!(body["sampled"], true);
    assert_eq!(body["values"][0][0], 0.0);
}

#[tokio::test]
async fn test_layer_read_errors() {
    let app = setup();

    let response = get(&app.router, "/data/salinity").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["type"], "NotFound");
    assert_eq!(body["detail"], "Layer 'salinity' not found");

    let response = get(&app.router, "/data/habitat_index_H?max_points=10").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["type"], "RangeError");

    let response = get(&app.router, "/data/habitat_index_H?max_points=lots").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Backing file listed in the metadata but absent from the source
    let response = get(&app.router, "/data/sst_celsius").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Point queries
// ============================================================================

#[tokio::test]
async fn test_predict() {
    let app = setup();
    let response = get(&app.router, "/predict?lat=-33.55&lon=151.3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["nearest_lat"], -33.5);
    assert_eq!(body["nearest_lon"], 151.25);
    assert_eq!(body["grid_indices"], serde_json::json!({"i": 10, "j": 9}));
    assert_eq!(body["interpretation"], "Low potential");
    assert!(body["H_index"].is_number());
}

#[tokio::test]
async fn test_predict_validation() {
    let app = setup();

    let response = get(&app.router, "/predict?lat=95&lon=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["detail"],
        "Latitude 95 out of bounds. Valid range: [-90.00, 90.00]"
    );

    let response = get(&app.router, "/predict?lat=0&lon=150").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["detail"],
        "Latitude 0 out of bounds. Valid range: [-36.00, -26.25]"
    );

    let response = get(&app.router, "/predict?lat=-30").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app.router, "/predict?lat=north&lon=150").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_meta_extent() {
    let app = setup();
    let response = get(&app.router, "/meta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["lat"], serde_json::json!({"size": 40, "min": -36.0, "max": -26.25}));
    assert_eq!(body["lon"]["size"], 50);
}

// ============================================================================
// Habitat and hotspots
// ============================================================================

#[tokio::test]
async fn test_habitat_generated() {
    let app = setup();
    let response = get(&app.router, "/data/habitat?threshold=0.5&max_features=20").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/geo+json");

    let body = body_json(response).await;
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 20);
    assert_eq!(body["metadata"]["total_zones"], 20);
    assert_eq!(body["metadata"]["total_available"], 1000);
    assert_eq!(body["metadata"]["source"], "habitat_index_H.nc");
    assert_eq!(body["features"][0]["geometry"]["type"], "Polygon");
}

#[tokio::test]
async fn test_habitat_json_format_and_validation() {
    let app = setup();
    let response = get(&app.router, "/data/habitat?format=json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");

    let response = get(&app.router, "/data/habitat?format=kml").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app.router, "/data/habitat?threshold=1.5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app.router, "/data/habitat?max_features=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_habitat_pregenerated_served_verbatim() {
    let app = setup();
    app.dir.write(files::HABITAT_GEOJSON, HABITAT_GEOJSON);

    let response = get(&app.router, "/data/habitat").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let expected: serde_json::Value = serde_json::from_str(HABITAT_GEOJSON).unwrap();
    assert_eq!(body, expected);
    assert_eq!(app.source.loads(), 0);
}

#[tokio::test]
async fn test_hotspots() {
    let app = setup();
    let response = get(&app.router, "/hotspots").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["hotspots"][0][""], 1287);
    assert_eq!(body["hotspots"][0]["H"], 0.93);

    app.dir.remove(files::HOTSPOTS);
    let response = get(&app.router, "/hotspots").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_habitat_layer_loaded_once_across_endpoints() {
    let app = setup();
    get(&app.router, "/predict?lat=-30&lon=150").await;
    get(&app.router, "/meta").await;
    get(&app.router, "/data/habitat_index_H").await;
    get(&app.router, "/data/habitat?threshold=0.9").await;

    assert_eq!(app.source.loads(), 1);
}
