//! API response bodies.
//!
//! Every successful JSON response and the shared exception body.

use std::collections::BTreeMap;

use grid_common::LayerTable;
use serde::{Deserialize, Serialize};

/// Landing document for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Route → short description
    pub endpoints: BTreeMap<String, String>,
    pub available_layers: Vec<String>,
    pub data_directory: String,
}

impl RootResponse {
    /// Landing document listing the standard routes.
    pub fn new(
        version: impl Into<String>,
        available_layers: Vec<String>,
        data_directory: impl Into<String>,
    ) -> Self {
        let endpoints = [
            ("/", "This document"),
            ("/health", "Liveness check"),
            ("/ready", "Readiness check (metadata table loads)"),
            ("/metrics", "Prometheus metrics"),
            ("/data/layers", "All available layers from the metadata table"),
            ("/data/habitat", "GeoJSON habitat zones"),
            ("/data/{layer_name}", "JSON grid of one layer"),
            ("/predict?lat={lat}&lon={lon}", "Habitat index at a point"),
            ("/hotspots", "Highest-potential zones (top 20%)"),
            ("/meta", "Extent of the habitat grid"),
        ]
        .into_iter()
        .map(|(route, description)| (route.to_string(), description.to_string()))
        .collect();

        Self {
            name: "Ocean Habitat Data API".to_string(),
            version: version.into(),
            description: "Gridded ocean and habitat suitability data for map clients".to_string(),
            endpoints,
            available_layers,
            data_directory: data_directory.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Habitat data API is running".to_string(),
        }
    }
}

/// Body of `GET /ready`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadyResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReadyResponse {
    pub fn ready() -> Self {
        Self {
            status: "ready".to_string(),
            detail: None,
        }
    }

    pub fn not_ready(detail: impl Into<String>) -> Self {
        Self {
            status: "not_ready".to_string(),
            detail: Some(detail.into()),
        }
    }
}

/// Body of `GET /data/layers`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LayersResponse {
    pub layers: LayerTable,
    pub count: usize,
    pub description: String,
}

impl LayersResponse {
    pub fn new(layers: LayerTable) -> Self {
        Self {
            count: layers.len(),
            layers,
            description: "Ocean layers available for visualization".to_string(),
        }
    }
}

/// Body of `GET /hotspots`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HotspotsResponse<T> {
    pub hotspots: Vec<T>,
    pub count: usize,
    pub description: String,
}

impl<T: Serialize> HotspotsResponse<T> {
    pub fn new(hotspots: Vec<T>) -> Self {
        Self {
            count: hotspots.len(),
            hotspots,
            description: "Top 20% of zones by habitat index".to_string(),
        }
    }
}

/// Exception response for errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type identifier (the error code).
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ExceptionResponse {
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Create a 400 Bad Request exception.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("InvalidParameterValue", 400, detail).with_title("Bad Request")
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("NotFound", 404, detail).with_title("Not Found")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new("ServerError", 500, detail).with_title("Internal Server Error")
    }

    /// Create a 503 Service Unavailable exception.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new("ServiceUnavailable", 503, detail).with_title("Service Unavailable")
    }
}
