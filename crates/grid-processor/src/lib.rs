//! Gridded data processing for the ocean habitat service.
//!
//! This crate holds the core operations over loaded grids:
//!
//! - **Coordinate resolution**: find latitude/longitude axes under any of the
//!   naming conventions in use, or synthesize them from a dimension
//! - **Sampling**: strided subsampling under a point ceiling
//! - **Point queries**: nearest cell lookup and habitat classification
//! - **Extraction**: threshold-filtered habitat zones and the hotspot table
//!
//! # Architecture
//!
//! ```text
//! HTTP handler
//!      │
//!      ▼
//! GridDataService
//!      │
//!      ├─► DatasetCache::get_grid(layer)  (loads once per layer)
//!      │
//!      ├─► resolve_axes(grid)
//!      │
//!      └─► sample | query_point | extract_features
//!               │
//!               ▼
//!          LayerData / PointQueryResult / HabitatExtraction
//! ```

pub mod config;
pub mod coords;
pub mod extract;
pub mod hotspots;
pub mod query;
pub mod sampling;
pub mod service;
pub mod types;

pub use config::GridProcessorConfig;
pub use coords::{resolve_axes, resolve_axis, AxisKind, CoordinateAxes};
pub use extract::{
    extract_features, validate_extraction, ExtractionOptions, HabitatExtraction, HabitatZone,
    ZonePotential,
};
pub use hotspots::{load_hotspots, parse_hotspots, HotspotRecord};
pub use query::{nearest_index, query_point, Potential};
pub use sampling::{decimate_axis, sample, sampling_factor};
pub use service::{
    primary_variable, GridDataService, HabitatCollection, DEFAULT_MAX_POINTS, MAX_MAX_POINTS,
    MIN_MAX_POINTS,
};
pub use types::{AxisExtent, FieldStats, GridExtent, GridIndices, LayerData, PointQueryResult};
