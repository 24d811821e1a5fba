//! NetCDF reader for pre-processed ocean grids.
//!
//! Reads every dimension, variable and attribute of a NetCDF file into a
//! [`grid_common::Grid`]. Packed values are unpacked on the way in:
//! `_FillValue` / `missing_value` cells become `NaN` and `scale_factor` /
//! `add_offset` are applied.
//!
//! Requires the system `libnetcdf` and `libhdf5` libraries.

pub mod error;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{assemble_grid, read_grid, silence_hdf5_errors, unpack_values, RawVariable};
