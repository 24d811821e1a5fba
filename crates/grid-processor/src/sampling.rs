//! Uniform strided subsampling of 2-D fields.
//!
//! A field larger than the requested point ceiling keeps every `factor`-th
//! row and column, starting at index 0. No interpolation or averaging takes
//! place, so every served value is an original cell value.

use std::borrow::Cow;

use grid_common::Field2D;

/// Stride needed to bring `count` cells down to about `max_points`.
///
/// Returns 1 when no reduction is needed.
pub fn sampling_factor(count: usize, max_points: usize) -> usize {
    let max_points = max_points.max(1);
    if count <= max_points {
        return 1;
    }
    let factor = (count as f64 / max_points as f64).sqrt().ceil() as usize;
    factor.max(1)
}

/// Subsample a field so it holds at most about `max_points` cells.
///
/// Returns the (possibly unchanged) field and the factor applied. The
/// coordinate axes must be decimated with [`decimate_axis`] using the same
/// factor.
pub fn sample(field: Field2D<'_>, max_points: usize) -> (Field2D<'_>, usize) {
    let factor = sampling_factor(field.len(), max_points);
    if factor == 1 {
        return (field, 1);
    }

    let rows = field.rows().div_ceil(factor);
    let cols = field.cols().div_ceil(factor);
    let mut values = Vec::with_capacity(rows * cols);
    for row in field.row_slices().step_by(factor) {
        values.extend(row.iter().step_by(factor));
    }

    // rows * cols == values.len() by construction
    let sampled = match Field2D::owned(values, rows, cols) {
        Ok(sampled) => sampled,
        Err(_) => return (field, 1),
    };
    (sampled, factor)
}

/// Keep every `factor`-th entry of an axis, starting at index 0.
pub fn decimate_axis(axis: Cow<'_, [f64]>, factor: usize) -> Cow<'_, [f64]> {
    if factor <= 1 {
        return axis;
    }
    Cow::Owned(axis.iter().step_by(factor).copied().collect())
}
