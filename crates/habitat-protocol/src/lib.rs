//! Habitat data API protocol types.
//!
//! This crate holds the JSON bodies the HTTP service returns: the landing
//! document, layer and hotspot listings, the habitat GeoJSON feature
//! collection and the exception body used for every error.
//!
//! # Example
//!
//! ```rust
//! use habitat_protocol::{FeatureCollection, HabitatFeature, HabitatProperties};
//!
//! let ring = vec![
//!     [151.125, -33.625],
//!     [151.375, -33.625],
//!     [151.375, -33.375],
//!     [151.125, -33.375],
//!     [151.125, -33.625],
//! ];
//! let feature = HabitatFeature::polygon(ring, HabitatProperties {
//!     h_index: 0.93,
//!     latitude: -33.5,
//!     longitude: 151.25,
//!     habitat_potential: "high".to_string(),
//!     confidence: 93.0,
//! });
//! let collection = FeatureCollection::new(vec![feature]);
//! assert_eq!(collection.features.len(), 1);
//! ```

pub mod geojson;
pub mod responses;

pub use geojson::{CollectionMetadata, FeatureCollection, Geometry, HabitatFeature, HabitatProperties};
pub use responses::{
    ExceptionResponse, HealthResponse, HotspotsResponse, LayersResponse, ReadyResponse,
    RootResponse,
};

/// Media types served by the API.
pub mod media_types {
    pub const JSON: &str = "application/json";
    pub const GEOJSON: &str = "application/geo+json";
}
