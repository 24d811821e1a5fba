//! High-level grid data service.
//!
//! `GridDataService` ties the catalog, the dataset cache and the processing
//! functions together. It is the interface the HTTP layer calls; every
//! method is synchronous and may block on file I/O the first time a layer is
//! read.
//!
//! # Example
//!
//! ```rust,ignore
//! let service = GridDataService::new(GridProcessorConfig::from_env(), DataDirectory::new("processed_data"));
//!
//! let layer = service.read_layer("sst_celsius", true, 10_000)?;
//! let point = service.predict(-33.9, 151.2)?;
//! ```

use std::sync::Arc;

use grid_common::{Grid, GridError, GridResult, LayerTable, Variable};
use storage::{Catalog, DataDirectory, DatasetCache, GridCacheStats, GridSource, NetCdfFileSource};
use tracing::{debug, info, instrument};

use crate::config::GridProcessorConfig;
use crate::coords::resolve_axes;
use crate::extract::{extract_features, validate_extraction, HabitatExtraction};
use crate::hotspots::{load_hotspots, HotspotRecord};
use crate::query::query_point;
use crate::sampling::{decimate_axis, sample};
use crate::types::{AxisExtent, FieldStats, GridExtent, LayerData, PointQueryResult};

/// Smallest accepted `max_points`.
pub const MIN_MAX_POINTS: usize = 100;
/// Largest accepted `max_points`.
pub const MAX_MAX_POINTS: usize = 100_000;
/// `max_points` used when the caller gives none.
pub const DEFAULT_MAX_POINTS: usize = 10_000;

/// Variable names never served as a layer's primary variable.
const NON_DATA_NAMES: [&str; 7] = ["lat", "lon", "latitude", "longitude", "time", "x", "y"];

/// The habitat feature collection, either read from disk or generated.
#[derive(Debug, Clone, PartialEq)]
pub enum HabitatCollection {
    /// Contents of the pre-generated GeoJSON file, served verbatim.
    Pregenerated(serde_json::Value),
    /// Zones extracted from the habitat raster.
    Generated {
        extraction: HabitatExtraction,
        /// Backing file of the habitat layer
        source: String,
    },
}

/// High-level service for reading and querying gridded layers.
pub struct GridDataService {
    config: GridProcessorConfig,
    data_dir: DataDirectory,
    cache: DatasetCache,
}

impl GridDataService {
    /// Create a service reading `metadata.json` and NetCDF layers from the
    /// data directory.
    pub fn new(config: GridProcessorConfig, data_dir: DataDirectory) -> Self {
        let catalog = Arc::new(Catalog::from_file(
            data_dir.clone(),
            config.metadata_file.clone(),
        ));
        let source = Arc::new(NetCdfFileSource::new(data_dir.clone()));
        Self::with_parts(config, data_dir, catalog, source)
    }

    /// Create a service over an explicit catalog and grid source.
    pub fn with_parts(
        config: GridProcessorConfig,
        data_dir: DataDirectory,
        catalog: Arc<Catalog>,
        source: Arc<dyn GridSource>,
    ) -> Self {
        Self {
            config,
            data_dir,
            cache: DatasetCache::new(catalog, source),
        }
    }

    pub fn config(&self) -> &GridProcessorConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &DataDirectory {
        &self.data_dir
    }

    pub fn cache_stats(&self) -> GridCacheStats {
        self.cache.stats()
    }

    /// Whether the metadata catalog can be loaded.
    pub fn is_ready(&self) -> bool {
        self.cache.catalog().load().is_ok()
    }

    /// All layers, ordered by name.
    pub fn list_layers(&self) -> GridResult<Arc<LayerTable>> {
        self.cache.catalog().list_layers()
    }

    /// Load (or fetch from cache) the grid of a layer.
    pub fn grid(&self, layer: &str) -> GridResult<Arc<Grid>> {
        self.cache.get_grid(layer, true)
    }

    /// Read a layer's primary variable as a 2-D array with its axes.
    ///
    /// When `sample` is set and the field has more than `max_points` cells
    /// it is subsampled, and the axes are decimated with the same factor.
    #[instrument(skip(self))]
    pub fn read_layer(&self, layer: &str, sample_data: bool, max_points: usize) -> GridResult<LayerData> {
        if !(MIN_MAX_POINTS..=MAX_MAX_POINTS).contains(&max_points) {
            return Err(GridError::out_of_range_int(
                "max_points",
                max_points as i64,
                MIN_MAX_POINTS as i64,
                MAX_MAX_POINTS as i64,
            ));
        }

        let grid = self.grid(layer)?;
        let variable = primary_variable(&grid)?;
        let field = variable.field()?;
        let axes = resolve_axes(&grid)?;

        if axes.lat.len() != field.rows() || axes.lon.len() != field.cols() {
            return Err(GridError::load(format!(
                "axes of length {}x{} do not match the {}x{} field of '{}'",
                axes.lat.len(),
                axes.lon.len(),
                field.rows(),
                field.cols(),
                variable.name()
            )));
        }

        let (field, factor) = if sample_data && field.len() > max_points {
            sample(field, max_points)
        } else {
            (field, 1)
        };
        let lat = decimate_axis(axes.lat, factor);
        let lon = decimate_axis(axes.lon, factor);

        debug!(
            variable = variable.name(),
            rows = field.rows(),
            cols = field.cols(),
            factor,
            "Read layer"
        );

        Ok(LayerData {
            layer: layer.to_string(),
            variable: variable.name().to_string(),
            lat: lat.into_owned(),
            lon: lon.into_owned(),
            values: field.to_nested(),
            units: variable
                .text_attribute("units")
                .unwrap_or("unknown")
                .to_string(),
            long_name: variable
                .text_attribute("long_name")
                .unwrap_or(variable.name())
                .to_string(),
            stats: FieldStats::from_values(field.values()),
            shape: [field.rows(), field.cols()],
            sampled: sample_data,
            sampling_factor: factor,
        })
    }

    /// Habitat index at the grid cell nearest to `(lat, lon)`.
    #[instrument(skip(self))]
    pub fn predict(&self, lat: f64, lon: f64) -> GridResult<PointQueryResult> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GridError::out_of_range("Latitude", lat, -90.0, 90.0));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GridError::out_of_range("Longitude", lon, -180.0, 180.0));
        }

        let grid = self.grid(&self.config.habitat_layer)?;
        query_point(&grid, &self.config.habitat_variable, lat, lon)
    }

    /// Habitat zones above `threshold`, generated from the habitat raster.
    pub fn habitat_zones(&self, threshold: f64, max_features: usize) -> GridResult<HabitatExtraction> {
        let options = self.config.extraction_options();
        validate_extraction(threshold, max_features, &options)?;

        let grid = self.grid(&self.config.habitat_layer)?;
        extract_features(
            &grid,
            &self.config.habitat_variable,
            threshold,
            max_features,
            &options,
        )
    }

    /// The habitat collection: the pre-generated file when present,
    /// otherwise zones extracted from the raster. Parameters are validated
    /// in both cases.
    #[instrument(skip(self))]
    pub fn habitat(&self, threshold: f64, max_features: usize) -> GridResult<HabitatCollection> {
        validate_extraction(threshold, max_features, &self.config.extraction_options())?;

        if let Some(path) = self.data_dir.resolve(&self.config.habitat_geojson_file) {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| GridError::load(format!("cannot read {}: {}", path.display(), e)))?;
            let value = serde_json::from_str(&text).map_err(|e| {
                GridError::load(format!("{}: invalid JSON: {}", self.config.habitat_geojson_file, e))
            })?;
            info!(path = %path.display(), "Serving pre-generated habitat collection");
            return Ok(HabitatCollection::Pregenerated(value));
        }

        let source = self
            .cache
            .catalog()
            .get_layer(&self.config.habitat_layer)?
            .filename;
        let extraction = self.habitat_zones(threshold, max_features)?;
        Ok(HabitatCollection::Generated { extraction, source })
    }

    /// Rows of the pre-ranked hotspot table.
    pub fn hotspots(&self) -> GridResult<Vec<HotspotRecord>> {
        let path = self.data_dir.require(&self.config.hotspots_file)?;
        load_hotspots(&path)
    }

    /// Size and range of the habitat layer's axes.
    pub fn habitat_extent(&self) -> GridResult<GridExtent> {
        let grid = self.grid(&self.config.habitat_layer)?;
        let axes = resolve_axes(&grid)?;
        Ok(GridExtent {
            lat: AxisExtent::of(&axes.lat)
                .ok_or_else(|| GridError::load("latitude axis has no finite values"))?,
            lon: AxisExtent::of(&axes.lon)
                .ok_or_else(|| GridError::load("longitude axis has no finite values"))?,
        })
    }
}

/// The variable a layer serves: the first data variable that is not an
/// axis-like name.
pub fn primary_variable(grid: &Grid) -> GridResult<&Variable> {
    grid.data_vars()
        .iter()
        .find(|v| !NON_DATA_NAMES.contains(&v.name()))
        .ok_or_else(|| GridError::load("no data variable found in grid"))
}
