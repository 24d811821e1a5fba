//! Nearest-cell point queries and habitat potential classification.
//!
//! The nearest cell is found per axis: the latitude index minimizes
//! `|lat[i] - lat|` and the longitude index minimizes `|lon[j] - lon|`
//! independently, in degrees. No 2-D or great-circle distance is computed.

use grid_common::{Grid, GridError, GridResult};

use crate::coords::resolve_axes;
use crate::types::{AxisExtent, GridIndices, PointQueryResult};

/// Qualitative habitat potential of a point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Potential {
    High,
    Moderate,
    Low,
}

impl Potential {
    /// Classify a value: above 0.7 is high, above 0.4 moderate, anything
    /// else (including missing) low.
    pub fn classify(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.7 => Potential::High,
            Some(v) if v > 0.4 => Potential::Moderate,
            _ => Potential::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Potential::High => "High potential",
            Potential::Moderate => "Moderate potential",
            Potential::Low => "Low potential",
        }
    }
}

/// Index of the axis entry closest to `target`.
///
/// Ties resolve to the first index; NaN entries are skipped. `None` if the
/// axis has no comparable entry.
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in axis.iter().enumerate() {
        let distance = (v - target).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Check that a value lies within an axis' extent, inclusive.
pub fn check_in_extent(parameter: &str, value: f64, extent: &AxisExtent) -> GridResult<()> {
    if extent.contains(value) {
        Ok(())
    } else {
        Err(GridError::out_of_range(parameter, value, extent.min, extent.max))
    }
}

/// Answer a point query against `variable` of a grid.
///
/// The request must fall within the resolved axes' extent. The value at
/// the nearest cell is returned, with non-finite values reported as `None`.
pub fn query_point(grid: &Grid, variable: &str, lat: f64, lon: f64) -> GridResult<PointQueryResult> {
    let axes = resolve_axes(grid)?;
    let lat_extent = AxisExtent::of(&axes.lat)
        .ok_or_else(|| GridError::load("latitude axis has no finite values"))?;
    let lon_extent = AxisExtent::of(&axes.lon)
        .ok_or_else(|| GridError::load("longitude axis has no finite values"))?;

    check_in_extent("Latitude", lat, &lat_extent)?;
    check_in_extent("Longitude", lon, &lon_extent)?;

    let field = grid
        .data_var(variable)
        .ok_or_else(|| GridError::load(format!("variable '{}' not found in grid", variable)))?
        .field()?;

    // Extents exist, so both axes have a finite entry.
    let i = nearest_index(&axes.lat, lat)
        .ok_or_else(|| GridError::load("latitude axis has no finite values"))?;
    let j = nearest_index(&axes.lon, lon)
        .ok_or_else(|| GridError::load("longitude axis has no finite values"))?;

    let raw = field.get(i, j).ok_or_else(|| {
        GridError::load(format!(
            "cell ({}, {}) is outside the {}x{} field of '{}'",
            i,
            j,
            field.rows(),
            field.cols(),
            variable
        ))
    })?;
    let value = raw.is_finite().then_some(raw);

    Ok(PointQueryResult {
        lat,
        lon,
        value,
        nearest_lat: axes.lat[i],
        nearest_lon: axes.lon[j],
        grid_indices: GridIndices { i, j },
        interpretation: Potential::classify(value).label().to_string(),
    })
}
