//! Generators for synthetic gridded data.
//!
//! Every generator is deterministic so tests can assert on exact cells.

use grid_common::{Grid, Variable};

/// Evenly spaced axis of `len` values starting at `start`.
///
/// # Example
///
/// ```
/// use test_utils::create_axis;
///
/// assert_eq!(create_axis(-1.0, 0.5, 3), vec![-1.0, -0.5, 0.0]);
/// ```
pub fn create_axis(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Values laid out so that `grid[row][col] == row * 1000 + col`.
///
/// Handy for checking that strided sampling picked the right cells.
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(3, 4);
/// assert_eq!(grid.len(), 12);
/// assert_eq!(grid[5], 1001.0); // row 1, col 1
/// ```
pub fn create_index_grid(rows: usize, cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((row * 1000 + col) as f64);
        }
    }
    data
}

/// Habitat index values in `[0, 1]` rising linearly in row-major order.
///
/// The first cell is 0.0 and the last is 1.0.
pub fn create_habitat_values(rows: usize, cols: usize) -> Vec<f64> {
    let count = rows * cols;
    let denom = count.saturating_sub(1).max(1) as f64;
    (0..count).map(|k| k as f64 / denom).collect()
}

/// Sea surface temperature in Celsius, warm at the equator.
pub fn create_sst_values(lat: &[f64], cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(lat.len() * cols);
    for &la in lat {
        let temp = 28.0 - 0.3 * la.abs();
        data.extend(std::iter::repeat(temp).take(cols));
    }
    data
}

/// Constant-valued grid.
pub fn create_constant_grid(rows: usize, cols: usize, value: f64) -> Vec<f64> {
    vec![value; rows * cols]
}

/// Replace the listed `(row, col)` cells with NaN (land or missing data).
pub fn with_nan_cells(mut values: Vec<f64>, cols: usize, cells: &[(usize, usize)]) -> Vec<f64> {
    for &(row, col) in cells {
        if let Some(v) = values.get_mut(row * cols + col) {
            *v = f64::NAN;
        }
    }
    values
}

/// A grid with `lat`/`lon` coordinate axes and one data variable over them.
///
/// # Panics
///
/// Panics if `values.len() != lat.len() * lon.len()`.
pub fn create_layer_grid(variable: &str, lat: Vec<f64>, lon: Vec<f64>, values: Vec<f64>) -> Grid {
    let (rows, cols) = (lat.len(), lon.len());
    Grid::builder()
        .coordinate(Variable::axis("lat", lat))
        .coordinate(Variable::axis("lon", lon))
        .data_var(
            Variable::grid2d(variable, "lat", "lon", rows, cols, values)
                .expect("values must match the axes"),
        )
        .build()
        .expect("synthetic grid must be consistent")
}

/// Habitat layer in the shape the service expects: an `H_index` variable
/// with units and a long name.
pub fn habitat_grid(lat: Vec<f64>, lon: Vec<f64>, values: Vec<f64>) -> Grid {
    let (rows, cols) = (lat.len(), lon.len());
    Grid::builder()
        .coordinate(Variable::axis("lat", lat))
        .coordinate(Variable::axis("lon", lon))
        .data_var(
            Variable::grid2d("H_index", "lat", "lon", rows, cols, values)
                .expect("values must match the axes")
                .with_attribute("units", "1")
                .with_attribute("long_name", "Habitat suitability index"),
        )
        .attribute("title", "Synthetic habitat index")
        .build()
        .expect("synthetic grid must be consistent")
}

/// Habitat grid over a regular box at 0.25 degree spacing.
///
/// Latitude runs from `lat0` upward, longitude from `lon0` eastward, and
/// the index rises linearly across the grid.
pub fn regular_habitat_grid(lat0: f64, lon0: f64, rows: usize, cols: usize) -> Grid {
    habitat_grid(
        create_axis(lat0, 0.25, rows),
        create_axis(lon0, 0.25, cols),
        create_habitat_values(rows, cols),
    )
}
