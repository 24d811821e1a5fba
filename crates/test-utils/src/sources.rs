//! In-memory grid sources for cache and service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use grid_common::{Grid, GridError, GridResult, LayerDescriptor};
use storage::GridSource;

/// A `GridSource` serving grids keyed by backing file name and counting
/// every load, successful or not.
#[derive(Default)]
pub struct CountingGridSource {
    grids: HashMap<String, Grid>,
    failing: HashMap<String, GridError>,
    delay: Option<Duration>,
    loads: AtomicUsize,
    loaded: Mutex<Vec<String>>,
}

impl CountingGridSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `grid` for the given backing file name.
    pub fn with_grid(mut self, filename: impl Into<String>, grid: Grid) -> Self {
        self.grids.insert(filename.into(), grid);
        self
    }

    /// Fail every load of the given backing file name with `error`.
    pub fn with_failure(mut self, filename: impl Into<String>, error: GridError) -> Self {
        self.failing.insert(filename.into(), error);
        self
    }

    /// Sleep this long inside every load.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of loads performed so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Backing file names in load order.
    pub fn loaded_files(&self) -> Vec<String> {
        self.loaded.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl GridSource for CountingGridSource {
    fn load(&self, descriptor: &LayerDescriptor) -> GridResult<Grid> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(descriptor.filename.clone());

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        if let Some(error) = self.failing.get(&descriptor.filename) {
            return Err(error.clone());
        }

        self.grids
            .get(&descriptor.filename)
            .cloned()
            .ok_or_else(|| GridError::not_found(format!("File {} not found", descriptor.filename)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regular_habitat_grid;

    #[test]
    fn test_counts_every_load() {
        let source = CountingGridSource::new()
            .with_grid("h.nc", regular_habitat_grid(0.0, 0.0, 2, 2))
            .with_failure("bad.nc", GridError::load("bad.nc: corrupt"));

        assert!(source.load(&LayerDescriptor::new("h", "h.nc")).is_ok());
        assert!(matches!(
            source.load(&LayerDescriptor::new("bad", "bad.nc")),
            Err(GridError::Load(_))
        ));
        assert!(matches!(
            source.load(&LayerDescriptor::new("x", "missing.nc")),
            Err(GridError::NotFound(_))
        ));
        assert_eq!(source.loads(), 3);
        assert_eq!(source.loaded_files(), vec!["h.nc", "bad.nc", "missing.nc"]);
    }
}
