//! Configuration for the grid data service.

use serde::{Deserialize, Serialize};

use crate::extract::{ExtractionOptions, DEFAULT_CELL_HALF_SIZE, DEFAULT_MAX_FEATURES_LIMIT};

/// Configuration for the grid data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridProcessorConfig {
    /// Logical layer holding the habitat index.
    pub habitat_layer: String,

    /// Variable of the habitat layer used for point queries and extraction.
    pub habitat_variable: String,

    /// Half-size of an extracted zone footprint in degrees.
    pub cell_half_size: f64,

    /// Upper bound accepted for `max_features`.
    pub max_features_limit: usize,

    /// Pre-ranked hotspot table in the data directory.
    pub hotspots_file: String,

    /// Optional pre-generated habitat collection in the data directory.
    pub habitat_geojson_file: String,

    /// Metadata table in the data directory.
    pub metadata_file: String,
}

impl Default for GridProcessorConfig {
    fn default() -> Self {
        Self {
            habitat_layer: "habitat_index_H".to_string(),
            habitat_variable: "H_index".to_string(),
            cell_half_size: DEFAULT_CELL_HALF_SIZE,
            max_features_limit: DEFAULT_MAX_FEATURES_LIMIT,
            hotspots_file: "hotspots_H_top20.csv".to_string(),
            habitat_geojson_file: "habitat_potentiel.geojson".to_string(),
            metadata_file: "metadata.json".to_string(),
        }
    }
}

impl GridProcessorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("HABITAT_LAYER") {
            config.habitat_layer = val;
        }

        if let Ok(val) = std::env::var("HABITAT_VARIABLE") {
            config.habitat_variable = val;
        }

        if let Ok(val) = std::env::var("HABITAT_CELL_HALF_SIZE") {
            if let Ok(size) = val.parse() {
                config.cell_half_size = size;
            }
        }

        if let Ok(val) = std::env::var("HABITAT_MAX_FEATURES_LIMIT") {
            if let Ok(limit) = val.parse() {
                config.max_features_limit = limit;
            }
        }

        if let Ok(val) = std::env::var("HOTSPOTS_FILE") {
            config.hotspots_file = val;
        }

        if let Ok(val) = std::env::var("HABITAT_GEOJSON_FILE") {
            config.habitat_geojson_file = val;
        }

        if let Ok(val) = std::env::var("METADATA_FILE") {
            config.metadata_file = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.habitat_layer.is_empty() {
            return Err("habitat_layer must not be empty".to_string());
        }

        if self.habitat_variable.is_empty() {
            return Err("habitat_variable must not be empty".to_string());
        }

        if !(self.cell_half_size.is_finite() && self.cell_half_size > 0.0) {
            return Err("cell_half_size must be a positive number of degrees".to_string());
        }

        if self.max_features_limit == 0 {
            return Err("max_features_limit must be > 0".to_string());
        }

        for (name, file) in [
            ("hotspots_file", &self.hotspots_file),
            ("habitat_geojson_file", &self.habitat_geojson_file),
            ("metadata_file", &self.metadata_file),
        ] {
            if file.is_empty() {
                return Err(format!("{} must not be empty", name));
            }
        }

        Ok(())
    }

    /// Extraction limits derived from this configuration.
    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            cell_half_size: self.cell_half_size,
            max_features_limit: self.max_features_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridProcessorConfig::default();
        assert_eq!(config.habitat_layer, "habitat_index_H");
        assert_eq!(config.habitat_variable, "H_index");
        assert_eq!(config.cell_half_size, 0.125);
        assert_eq!(config.max_features_limit, 50_000);
        assert_eq!(config.hotspots_file, "hotspots_H_top20.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GridProcessorConfig::default();
        config.cell_half_size = 0.0;
        assert!(config.validate().is_err());

        config = GridProcessorConfig::default();
        config.cell_half_size = f64::NAN;
        assert!(config.validate().is_err());

        config = GridProcessorConfig::default();
        config.max_features_limit = 0;
        assert!(config.validate().is_err());

        config = GridProcessorConfig::default();
        config.metadata_file.clear();
        assert_eq!(
            config.validate().unwrap_err(),
            "metadata_file must not be empty"
        );
    }

    #[test]
    fn test_extraction_options() {
        let config = GridProcessorConfig {
            cell_half_size: 0.5,
            max_features_limit: 10,
            ..Default::default()
        };
        let options = config.extraction_options();
        assert_eq!(options.cell_half_size, 0.5);
        assert_eq!(options.max_features_limit, 10);
    }
}
