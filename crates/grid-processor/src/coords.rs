//! Latitude/longitude axis resolution.
//!
//! Backing files name their axes inconsistently (`lat` vs `latitude`,
//! declared coordinate vs plain variable, or only a dimension). Resolution
//! walks an ordered list of strategies and takes the first that matches.

use std::borrow::Cow;

use grid_common::{Grid, GridError, GridResult, Variable};
use tracing::debug;

/// The physical axis being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Latitude,
    Longitude,
}

impl AxisKind {
    pub fn short_name(self) -> &'static str {
        match self {
            AxisKind::Latitude => "lat",
            AxisKind::Longitude => "lon",
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            AxisKind::Latitude => "latitude",
            AxisKind::Longitude => "longitude",
        }
    }

    /// Full geographic range, used when synthesizing an axis.
    pub fn global_range(self) -> (f64, f64) {
        match self {
            AxisKind::Latitude => (-90.0, 90.0),
            AxisKind::Longitude => (-180.0, 180.0),
        }
    }
}

type Strategy = fn(&Grid, AxisKind) -> Option<Cow<'_, [f64]>>;

/// Resolution strategies, in precedence order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("declared coordinate, short name", declared_short),
    ("declared coordinate, long name", declared_long),
    ("variable, short name", variable_short),
    ("variable, long name", variable_long),
    ("synthesized from dimension", synthesized),
];

/// The latitude and longitude axes of a grid.
///
/// Axes read from the grid are borrowed; synthesized axes are owned.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateAxes<'a> {
    pub lat: Cow<'a, [f64]>,
    pub lon: Cow<'a, [f64]>,
}

/// Resolve both axes of a grid.
pub fn resolve_axes(grid: &Grid) -> GridResult<CoordinateAxes<'_>> {
    Ok(CoordinateAxes {
        lat: resolve_axis(grid, AxisKind::Latitude)?,
        lon: resolve_axis(grid, AxisKind::Longitude)?,
    })
}

/// Resolve a single axis.
///
/// Fails with a coordinate error listing every coordinate, variable and
/// dimension name that was inspected.
pub fn resolve_axis(grid: &Grid, kind: AxisKind) -> GridResult<Cow<'_, [f64]>> {
    for (description, strategy) in STRATEGIES {
        if let Some(axis) = strategy(grid, kind) {
            debug!(axis = kind.long_name(), strategy = *description, len = axis.len(), "Resolved axis");
            return Ok(axis);
        }
    }

    Err(GridError::Coordinate {
        coordinate: kind.long_name().to_string(),
        coordinates: grid.coordinate_names(),
        variables: grid.variable_names(),
        dimensions: grid.dimension_names(),
    })
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

fn one_dimensional(var: Option<&Variable>) -> Option<Cow<'_, [f64]>> {
    var.filter(|v| v.ndim() == 1)
        .map(|v| Cow::Borrowed(v.values()))
}

fn declared_short(grid: &Grid, kind: AxisKind) -> Option<Cow<'_, [f64]>> {
    one_dimensional(grid.coordinate(kind.short_name()))
}

fn declared_long(grid: &Grid, kind: AxisKind) -> Option<Cow<'_, [f64]>> {
    one_dimensional(grid.coordinate(kind.long_name()))
}

fn variable_short(grid: &Grid, kind: AxisKind) -> Option<Cow<'_, [f64]>> {
    one_dimensional(grid.variable(kind.short_name()))
}

fn variable_long(grid: &Grid, kind: AxisKind) -> Option<Cow<'_, [f64]>> {
    one_dimensional(grid.variable(kind.long_name()))
}

fn synthesized(grid: &Grid, kind: AxisKind) -> Option<Cow<'_, [f64]>> {
    let len = grid.dimension_len(kind.short_name())?;
    let (start, end) = kind.global_range();
    Some(Cow::Owned(linspace(start, end, len)))
}
