//! Metadata catalog backed by `metadata.json`.
//!
//! The catalog maps logical layer names to their backing files. The table
//! is read at most once successfully per catalog; a failed read is retried
//! on the next access.

use std::sync::{Arc, Mutex, PoisonError};

use grid_common::{parse_layer_table, GridError, GridResult, LayerDescriptor, LayerTable};
use tracing::{info, warn};

use crate::data_dir::DataDirectory;

/// Default name of the metadata table in the data directory.
pub const DEFAULT_METADATA_FILE: &str = "metadata.json";

enum CatalogSource {
    File {
        data_dir: DataDirectory,
        filename: String,
    },
    Memory(Arc<LayerTable>),
}

/// Read-only registry of logical layers.
pub struct Catalog {
    source: CatalogSource,
    table: Mutex<Option<Arc<LayerTable>>>,
}

impl Catalog {
    /// Catalog read lazily from `filename` in the data directory.
    pub fn from_file(data_dir: DataDirectory, filename: impl Into<String>) -> Self {
        Self {
            source: CatalogSource::File {
                data_dir,
                filename: filename.into(),
            },
            table: Mutex::new(None),
        }
    }

    /// Catalog over an in-memory table.
    pub fn from_layers(layers: impl IntoIterator<Item = LayerDescriptor>) -> Self {
        let table: LayerTable = layers
            .into_iter()
            .map(|layer| (layer.name.clone(), layer))
            .collect();
        Self {
            source: CatalogSource::Memory(Arc::new(table)),
            table: Mutex::new(None),
        }
    }

    /// Load the table, reading it on first use.
    ///
    /// The lock is held across the read so that concurrent first accesses
    /// read the file once.
    pub fn load(&self) -> GridResult<Arc<LayerTable>> {
        let mut slot = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }

        let table = match &self.source {
            CatalogSource::Memory(table) => Arc::clone(table),
            CatalogSource::File { data_dir, filename } => {
                let table = read_table(data_dir, filename).map_err(|e| {
                    warn!(filename = %filename, error = %e, "Failed to load metadata catalog");
                    e
                })?;
                info!(filename = %filename, layers = table.len(), "Loaded metadata catalog");
                Arc::new(table)
            }
        };

        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Look up a single layer.
    pub fn get_layer(&self, name: &str) -> GridResult<LayerDescriptor> {
        self.load()?
            .get(name)
            .cloned()
            .ok_or_else(|| GridError::not_found(format!("Layer '{}' not found", name)))
    }

    /// All layers, ordered by name.
    pub fn list_layers(&self) -> GridResult<Arc<LayerTable>> {
        self.load()
    }

    /// Whether the table has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

fn read_table(data_dir: &DataDirectory, filename: &str) -> GridResult<LayerTable> {
    let path = data_dir.resolve(filename).ok_or_else(|| {
        GridError::config(format!(
            "{} not found in {}/",
            filename,
            data_dir.root().display()
        ))
    })?;
    let text = std::fs::read_to_string(&path)
        .map_err(|e| GridError::config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_layer_table(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_metadata(dir: &std::path::Path, json: &str) {
        std::fs::write(dir.join(DEFAULT_METADATA_FILE), json).unwrap();
    }

    #[test]
    fn test_get_layer() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(
            dir.path(),
            r#"{"sst": {"filename": "sst.nc", "description": "SST"}}"#,
        );
        let catalog = Catalog::from_file(DataDirectory::new(dir.path()), DEFAULT_METADATA_FILE);

        let layer = catalog.get_layer("sst").unwrap();
        assert_eq!(layer.name, "sst");
        assert_eq!(layer.filename, "sst.nc");
        assert!(catalog.is_loaded());
    }

    #[test]
    fn test_unknown_layer_is_not_found() {
        let catalog = Catalog::from_layers([LayerDescriptor::new("a", "a.nc")]);
        let err = catalog.get_layer("b").unwrap_err();
        assert!(matches!(err, GridError::NotFound(_)));
        assert_eq!(err.to_string(), "Layer 'b' not found");
    }

    #[test]
    fn test_missing_table_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_file(DataDirectory::new(dir.path()), DEFAULT_METADATA_FILE);
        assert!(matches!(catalog.list_layers(), Err(GridError::Config(_))));
        assert!(!catalog.is_loaded());
    }

    #[test]
    fn test_malformed_table_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), "{ not json");
        let catalog = Catalog::from_file(DataDirectory::new(dir.path()), DEFAULT_METADATA_FILE);
        assert!(matches!(catalog.get_layer("x"), Err(GridError::Config(_))));
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_file(DataDirectory::new(dir.path()), DEFAULT_METADATA_FILE);
        assert!(catalog.load().is_err());

        write_metadata(dir.path(), r#"{"h": {"filename": "h.nc"}}"#);
        assert_eq!(catalog.load().unwrap().len(), 1);
    }

    #[test]
    fn test_table_is_memoized_after_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), r#"{"h": {"filename": "h.nc"}}"#);
        let catalog = Catalog::from_file(DataDirectory::new(dir.path()), DEFAULT_METADATA_FILE);

        let first = catalog.list_layers().unwrap();
        std::fs::remove_file(dir.path().join(DEFAULT_METADATA_FILE)).unwrap();
        let second = catalog.list_layers().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_list_layers_is_ordered() {
        let catalog = Catalog::from_layers([
            LayerDescriptor::new("sst", "sst.nc"),
            LayerDescriptor::new("chl", "chl.nc"),
            LayerDescriptor::new("habitat_index_H", "h.nc"),
        ]);
        let names: Vec<_> = catalog.list_layers().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["chl", "habitat_index_H", "sst"]);
    }
}
