//! Application state for the habitat API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use grid_processor::{GridDataService, GridProcessorConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::DataDirectory;
use tracing::info;

/// Shared application state.
pub struct AppState {
    /// Grid data service shared with blocking tasks.
    pub service: Arc<GridDataService>,

    /// Prometheus recorder handle, when one is installed.
    pub prometheus: Option<PrometheusHandle>,

    /// Version reported on the landing page.
    pub version: String,
}

impl AppState {
    /// Create the state from environment configuration and a data directory.
    pub fn new(data_dir: impl Into<PathBuf>, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let config = GridProcessorConfig::from_env();
        config
            .validate()
            .map_err(|e| anyhow!("Invalid service configuration: {}", e))?;

        let data_dir = DataDirectory::new(data_dir);
        info!(
            data_dir = %data_dir.root().display(),
            habitat_layer = %config.habitat_layer,
            metadata_file = %config.metadata_file,
            "Grid data service configured"
        );

        let mut state = Self::with_service(GridDataService::new(config, data_dir));
        state.prometheus = prometheus;
        Ok(state)
    }

    /// Wrap an already built service.
    pub fn with_service(service: GridDataService) -> Self {
        Self {
            service: Arc::new(service),
            prometheus: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
