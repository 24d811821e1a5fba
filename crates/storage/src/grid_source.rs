//! Sources that load a layer's backing grid.

use std::time::Instant;

use grid_common::{Grid, GridError, GridResult, LayerDescriptor};
use netcdf_parser::NetCdfError;
use tracing::{debug, instrument};

use crate::data_dir::DataDirectory;

/// Loads the grid behind a layer descriptor.
///
/// Implementations block on I/O; callers in async contexts should run them
/// on a blocking thread.
pub trait GridSource: Send + Sync {
    fn load(&self, descriptor: &LayerDescriptor) -> GridResult<Grid>;
}

/// Reads NetCDF files from the data directory.
#[derive(Debug, Clone)]
pub struct NetCdfFileSource {
    data_dir: DataDirectory,
}

impl NetCdfFileSource {
    pub fn new(data_dir: DataDirectory) -> Self {
        Self { data_dir }
    }
}

impl GridSource for NetCdfFileSource {
    #[instrument(skip_all, fields(layer = %descriptor.name, file = %descriptor.filename))]
    fn load(&self, descriptor: &LayerDescriptor) -> GridResult<Grid> {
        let path = self.data_dir.require(&descriptor.filename)?;
        let start = Instant::now();

        let grid = netcdf_parser::read_grid(&path).map_err(|e| match e {
            NetCdfError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                GridError::not_found(format!("File {} not found", descriptor.filename))
            }
            other => GridError::load(format!("{}: {}", descriptor.filename, other)),
        })?;

        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Loaded NetCDF file");
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = NetCdfFileSource::new(DataDirectory::new(dir.path()));
        let err = source
            .load(&LayerDescriptor::new("sst", "sst.nc"))
            .unwrap_err();
        assert!(matches!(err, GridError::NotFound(_)));
    }

    #[test]
    fn test_corrupt_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sst.nc"), b"garbage").unwrap();
        let source = NetCdfFileSource::new(DataDirectory::new(dir.path()));
        let err = source
            .load(&LayerDescriptor::new("sst", "sst.nc"))
            .unwrap_err();
        assert!(matches!(err, GridError::Load(_)));
        assert!(err.to_string().contains("sst.nc"));
    }
}
