//! Shared test utilities for the ocean habitat data workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic grid generators (habitat index, gradients, NaN holes)
//! - File fixtures for the data directory (metadata table, hotspot CSV, GeoJSON)
//! - A counting in-memory `GridSource`
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{habitat_grid, TestDataDir};
//! ```

pub mod fixtures;
pub mod generators;
pub mod sources;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use sources::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(0.7001_f64, 0.7_f64, 0.001_f64); // passes
/// assert_approx_eq!(0.8_f64, 0.7_f64, 0.001_f64);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of `(lat, lon)` pairs.
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((-33.5001, 151.25), (-33.5, 151.25), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($lat1:expr, $lon1:expr), ($lat2:expr, $lon2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($lat1, $lat2, $epsilon);
        $crate::assert_approx_eq!($lon1, $lon2, $epsilon);
    }};
}
