//! In-memory cache of loaded grids, keyed by logical layer name.
//!
//! Entries are never evicted: the set of keys is bounded by the catalog and
//! the backing files never change while the process runs. Loads for the same
//! name are serialized so a grid is read from storage at most once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use grid_common::{Grid, GridResult, LayerDescriptor};
use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::grid_source::GridSource;

/// Statistics for the dataset cache
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GridCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub load_failures: u64,
    pub entries: usize,
}

impl GridCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
}

/// Process-wide cache of loaded grids.
pub struct DatasetCache {
    catalog: Arc<Catalog>,
    source: Arc<dyn GridSource>,
    entries: RwLock<HashMap<String, Arc<Grid>>>,
    /// One lock per layer name, held while that layer loads
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    counters: Counters,
}

impl DatasetCache {
    pub fn new(catalog: Arc<Catalog>, source: Arc<dyn GridSource>) -> Self {
        Self {
            catalog,
            source,
            entries: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    /// The catalog this cache resolves names through.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Get the grid for a logical layer name.
    ///
    /// With `use_cache`, a cached grid is returned without touching storage
    /// and a freshly loaded grid is stored. Without it the grid is always
    /// loaded and never stored.
    pub fn get_grid(&self, name: &str, use_cache: bool) -> GridResult<Arc<Grid>> {
        if use_cache {
            if let Some(grid) = self.lookup(name) {
                self.record_hit(name);
                return Ok(grid);
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        counter!("dataset_cache_misses_total").increment(1);

        let descriptor = self.catalog.get_layer(name)?;

        // Bypass loads take the same per-name lock, so at most one load of a
        // name is in flight whichever way it was requested.
        let key_lock = self.key_lock(name);
        let _guard = key_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !use_cache {
            return self.load(&descriptor).map(Arc::new);
        }

        // Another caller may have finished loading while we waited.
        if let Some(grid) = self.lookup(name) {
            debug!(layer = name, "Grid loaded by concurrent request");
            return Ok(grid);
        }

        let grid = Arc::new(self.load(&descriptor)?);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&grid));
        Ok(grid)
    }

    /// Whether a grid is cached under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of cached grids.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current cache statistics.
    pub fn stats(&self) -> GridCacheStats {
        GridCacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            load_failures: self.counters.load_failures.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lookup(&self, name: &str) -> Option<Arc<Grid>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn record_hit(&self, name: &str) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        counter!("dataset_cache_hits_total").increment(1);
        debug!(layer = name, "Dataset cache hit");
    }

    fn key_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(inflight.entry(name.to_string()).or_default())
    }

    fn load(&self, descriptor: &LayerDescriptor) -> GridResult<Grid> {
        let start = Instant::now();
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        counter!("dataset_loads_total").increment(1);

        match self.source.load(descriptor) {
            Ok(grid) => {
                let elapsed = start.elapsed();
                histogram!("dataset_load_duration_seconds").record(elapsed.as_secs_f64());
                info!(
                    layer = %descriptor.name,
                    file = %descriptor.filename,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Loaded dataset"
                );
                Ok(grid)
            }
            Err(e) => {
                self.counters.load_failures.fetch_add(1, Ordering::Relaxed);
                warn!(layer = %descriptor.name, error = %e, "Dataset load failed");
                Err(e)
            }
        }
    }
}
