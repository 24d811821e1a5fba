//! Threshold extraction of habitat zones from a raster.
//!
//! Every cell whose value strictly exceeds the threshold qualifies. Zones
//! are emitted in row-major order up to a caller-supplied cap, each with a
//! square footprint of fixed half-size centered on the cell coordinate.

use grid_common::{Grid, GridError, GridResult};

use crate::coords::resolve_axes;

/// Half-width/half-height of a zone footprint in degrees.
pub const DEFAULT_CELL_HALF_SIZE: f64 = 0.125;

/// Largest `max_features` a caller may request.
pub const DEFAULT_MAX_FEATURES_LIMIT: usize = 50_000;

/// Potential label of an extracted zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePotential {
    High,
    Medium,
}

impl ZonePotential {
    /// Above 0.8 is high, everything else that qualified is medium.
    pub fn classify(value: f64) -> Self {
        if value > 0.8 {
            ZonePotential::High
        } else {
            ZonePotential::Medium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZonePotential::High => "high",
            ZonePotential::Medium => "medium",
        }
    }
}

/// One qualifying cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitatZone {
    pub value: f64,
    pub lat: f64,
    pub lon: f64,
    pub potential: ZonePotential,
    /// `min(value * 100, 100)`
    pub confidence: f64,
    /// Closed ring of `[lon, lat]` pairs: SW, SE, NE, NW, SW
    pub footprint: [[f64; 2]; 5],
}

impl HabitatZone {
    fn new(value: f64, lat: f64, lon: f64, half: f64) -> Self {
        let sw = [lon - half, lat - half];
        Self {
            value,
            lat,
            lon,
            potential: ZonePotential::classify(value),
            confidence: (value * 100.0).min(100.0),
            footprint: [
                sw,
                [lon + half, lat - half],
                [lon + half, lat + half],
                [lon - half, lat + half],
                sw,
            ],
        }
    }
}

/// Zones extracted from a raster plus the number that qualified in total.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitatExtraction {
    pub zones: Vec<HabitatZone>,
    pub total_available: usize,
    pub threshold: f64,
    pub max_features: usize,
}

/// Limits applied to an extraction request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionOptions {
    pub cell_half_size: f64,
    pub max_features_limit: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            cell_half_size: DEFAULT_CELL_HALF_SIZE,
            max_features_limit: DEFAULT_MAX_FEATURES_LIMIT,
        }
    }
}

/// Validate extraction parameters without touching any grid.
pub fn validate_extraction(
    threshold: f64,
    max_features: usize,
    options: &ExtractionOptions,
) -> GridResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(GridError::out_of_range("Threshold", threshold, 0.0, 1.0));
    }
    if max_features < 1 || max_features > options.max_features_limit {
        return Err(GridError::out_of_range_int(
            "max_features",
            max_features as i64,
            1,
            options.max_features_limit as i64,
        ));
    }
    Ok(())
}

/// Extract the cells of `variable` above `threshold`.
pub fn extract_features(
    grid: &Grid,
    variable: &str,
    threshold: f64,
    max_features: usize,
    options: &ExtractionOptions,
) -> GridResult<HabitatExtraction> {
    validate_extraction(threshold, max_features, options)?;

    let axes = resolve_axes(grid)?;
    let field = grid
        .data_var(variable)
        .ok_or_else(|| GridError::load(format!("variable '{}' not found in grid", variable)))?
        .field()?;

    if axes.lat.len() != field.rows() || axes.lon.len() != field.cols() {
        return Err(GridError::load(format!(
            "axes of length {}x{} do not match the {}x{} field of '{}'",
            axes.lat.len(),
            axes.lon.len(),
            field.rows(),
            field.cols(),
            variable
        )));
    }

    let mut zones = Vec::new();
    let mut total_available = 0;
    for (i, row) in field.row_slices().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if value > threshold {
                total_available += 1;
                if zones.len() < max_features {
                    zones.push(HabitatZone::new(
                        value,
                        axes.lat[i],
                        axes.lon[j],
                        options.cell_half_size,
                    ));
                }
            }
        }
    }

    Ok(HabitatExtraction {
        zones,
        total_available,
        threshold,
        max_features,
    })
}
