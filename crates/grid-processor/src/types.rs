//! Core result types for grid processing.

use serde::{Deserialize, Serialize};

/// Summary statistics over the finite values of a field.
///
/// Each member is `None` when the field has no finite value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl FieldStats {
    /// Compute statistics, skipping NaN and infinite values.
    pub fn from_values(values: &[f64]) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &v in values.iter().filter(|v| v.is_finite()) {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: Some(min),
            max: Some(max),
            mean: Some(sum / count as f64),
        }
    }
}

/// Bulk read of a layer, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    pub layer: String,
    pub variable: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    /// Row-major values; non-finite cells are `None`
    pub values: Vec<Vec<Option<f64>>>,
    pub units: String,
    pub long_name: String,
    pub stats: FieldStats,
    pub shape: [usize; 2],
    pub sampled: bool,
    pub sampling_factor: usize,
}

/// Row/column of the grid cell answering a point query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndices {
    pub i: usize,
    pub j: usize,
}

/// Result of a nearest-cell point query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointQueryResult {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "H_index")]
    pub value: Option<f64>,
    pub nearest_lat: f64,
    pub nearest_lon: f64,
    pub grid_indices: GridIndices,
    pub interpretation: String,
}

/// Size and value range of one coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    pub size: usize,
    pub min: f64,
    pub max: f64,
}

impl AxisExtent {
    /// Extent of an axis, ignoring NaN entries. `None` if no entry is finite.
    pub fn of(axis: &[f64]) -> Option<Self> {
        let finite = axis.iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
        Some(Self {
            size: axis.len(),
            min,
            max,
        })
    }

    /// Inclusive containment check.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Extent of a grid's latitude and longitude axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridExtent {
    pub lat: AxisExtent,
    pub lon: AxisExtent,
}
