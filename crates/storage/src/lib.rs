//! Storage abstractions for the ocean habitat data service.
//!
//! Provides:
//! - Data directory resolution for pre-processed artifacts
//! - The metadata catalog (`metadata.json`), loaded once per process
//! - Grid sources that turn a layer descriptor into a loaded grid
//! - The dataset cache, which memoizes loaded grids by logical name

pub mod catalog;
pub mod data_dir;
pub mod grid_cache;
pub mod grid_source;

pub use catalog::Catalog;
pub use data_dir::DataDirectory;
pub use grid_cache::{DatasetCache, GridCacheStats};
pub use grid_source::{GridSource, NetCdfFileSource};
