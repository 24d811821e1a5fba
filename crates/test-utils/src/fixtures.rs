//! File fixtures for a processed data directory.
//!
//! `TestDataDir` is a temporary directory laid out like the one the service
//! reads in production: a metadata table, NetCDF layers, the hotspot CSV and
//! optionally a pre-generated habitat GeoJSON.

use std::fs;
use std::path::{Path, PathBuf};

use storage::DataDirectory;
use tempfile::TempDir;

/// Common logical layer names.
pub mod layers {
    /// Derived habitat suitability index
    pub const HABITAT: &str = "habitat_index_H";

    /// Sea surface temperature in Celsius
    pub const SST: &str = "sst_celsius";

    /// Chlorophyll-a concentration
    pub const CHLOROPHYLL: &str = "chlorophyll_a";

    /// Sea surface height anomaly
    pub const SSH: &str = "ssh_anomaly";
}

/// Common data directory file names.
pub mod files {
    pub const METADATA: &str = "metadata.json";
    pub const HOTSPOTS: &str = "hotspots_H_top20.csv";
    pub const HABITAT_GEOJSON: &str = "habitat_potentiel.geojson";
}

/// Metadata table describing the habitat and SST layers.
pub const METADATA_JSON: &str = r#"{
  "habitat_index_H": {
    "filename": "habitat_index_H.nc",
    "description": "Habitat suitability index",
    "size_MB": 1.5
  },
  "sst_celsius": {
    "filename": "sst_celsius.nc",
    "description": "Sea surface temperature",
    "size_MB": 3.25,
    "source": "MODIS-Aqua L3"
  }
}"#;

/// Hotspot table with an unnamed index column, as written by pandas.
pub const HOTSPOTS_CSV: &str = ",lat,lon,H,sst,chl
1287,-33.5,151.25,0.93,19.4,0.82
941,-34.0,150.75,0.91,18.9,1.10
1630,-32.75,152.5,0.88,20.2,0.64
";

/// A minimal pre-generated habitat collection.
pub const HABITAT_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[151.125, -33.625], [151.375, -33.625], [151.375, -33.375], [151.125, -33.375], [151.125, -33.625]]]
      },
      "properties": {"H_index": 0.93, "habitat_potential": "high"}
    }
  ],
  "metadata": {"source": "offline pipeline"}
}"#;

/// Build a metadata table from `(layer, filename)` pairs.
pub fn metadata_json(layers: &[(&str, &str)]) -> String {
    let table: serde_json::Map<String, serde_json::Value> = layers
        .iter()
        .map(|(name, filename)| {
            (
                name.to_string(),
                serde_json::json!({ "filename": filename }),
            )
        })
        .collect();
    serde_json::Value::Object(table).to_string()
}

/// A temporary processed data directory, removed on drop.
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    /// An empty directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A directory holding [`METADATA_JSON`] and [`HOTSPOTS_CSV`].
    pub fn with_defaults() -> Self {
        let dir = Self::new();
        dir.write(files::METADATA, METADATA_JSON);
        dir.write(files::HOTSPOTS, HOTSPOTS_CSV);
        dir
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the directory (which may not exist yet).
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file, replacing any previous content.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    /// Remove a file written earlier.
    pub fn remove(&self, name: &str) {
        fs::remove_file(self.file(name)).expect("failed to remove fixture");
    }

    /// A `DataDirectory` rooted at this directory.
    pub fn data_directory(&self) -> DataDirectory {
        DataDirectory::new(self.dir.path())
    }
}

impl Default for TestDataDir {
    fn default() -> Self {
        Self::new()
    }
}
