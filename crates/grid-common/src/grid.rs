//! In-memory representation of gridded geospatial datasets.
//!
//! A [`Grid`] mirrors the labelled-array model used by the offline pipeline
//! that produces the backing files: named dimensions, coordinate variables
//! and data variables, each carrying free-form attributes. Values are stored
//! as `f64` in row-major order, with `NaN` marking missing cells.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// An attribute value attached to a variable or grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Numbers(Vec<f64>),
}

impl AttrValue {
    /// Text content, if this is a text attribute.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar numeric content. Single-element arrays count as scalars.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Numbers(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

/// Attribute mapping (units, long_name, ...).
pub type Attributes = BTreeMap<String, AttrValue>;

/// A named dimension with a known length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// A named n-dimensional array with attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    dims: Vec<String>,
    shape: Vec<usize>,
    values: Vec<f64>,
    attributes: Attributes,
}

impl Variable {
    /// Create a variable, checking that the shape matches the value count.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<String>,
        shape: Vec<usize>,
        values: Vec<f64>,
    ) -> GridResult<Self> {
        let name = name.into();
        if dims.len() != shape.len() {
            return Err(GridError::load(format!(
                "variable '{}' declares {} dimensions but shape has {}",
                name,
                dims.len(),
                shape.len()
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(GridError::load(format!(
                "variable '{}' has shape {:?} ({} values) but {} values were provided",
                name,
                shape,
                expected,
                values.len()
            )));
        }
        Ok(Self {
            name,
            dims,
            shape,
            values,
            attributes: Attributes::new(),
        })
    }

    /// Create a 1-D coordinate axis whose dimension shares its name.
    pub fn axis(name: impl Into<String>, values: Vec<f64>) -> Self {
        let name = name.into();
        Self {
            dims: vec![name.clone()],
            shape: vec![values.len()],
            name,
            values,
            attributes: Attributes::new(),
        }
    }

    /// Create a 2-D variable over `(row_dim, col_dim)`.
    pub fn grid2d(
        name: impl Into<String>,
        row_dim: &str,
        col_dim: &str,
        rows: usize,
        cols: usize,
        values: Vec<f64>,
    ) -> GridResult<Self> {
        Self::new(
            name,
            vec![row_dim.to_string(), col_dim.to_string()],
            vec![rows, cols],
            values,
        )
    }

    /// Attach an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replace all attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Whether this is a 1-D variable over a dimension with its own name.
    pub fn is_dimension_coordinate(&self) -> bool {
        self.dims.len() == 1 && self.dims[0] == self.name
    }

    /// Look up a text attribute.
    pub fn text_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(AttrValue::as_text)
    }

    /// View this variable as a 2-D field over its last two dimensions.
    ///
    /// Variables with more than two dimensions are reduced by taking index 0
    /// along every leading dimension. In row-major order that slice is the
    /// first `rows * cols` values, so the view always borrows.
    pub fn field(&self) -> GridResult<Field2D<'_>> {
        if self.shape.len() < 2 {
            return Err(GridError::load(format!(
                "variable '{}' has {} dimension(s), at least 2 are required",
                self.name,
                self.shape.len()
            )));
        }
        let rows = self.shape[self.shape.len() - 2];
        let cols = self.shape[self.shape.len() - 1];
        let len = rows * cols;
        // A zero-length leading dimension (e.g. an unlimited time axis with no
        // records) leaves no slice to serve.
        let values = self.values.get(..len).ok_or_else(|| {
            GridError::load(format!(
                "variable '{}' of shape {:?} holds {} value(s), {} needed for a {}x{} field",
                self.name,
                self.shape,
                self.values.len(),
                len,
                rows,
                cols
            ))
        })?;
        Field2D::borrowed(values, rows, cols)
    }
}

/// A 2-D row-major array of values, borrowed from a [`Variable`] or owned
/// when derived (e.g. by sampling).
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D<'a> {
    values: Cow<'a, [f64]>,
    rows: usize,
    cols: usize,
}

impl<'a> Field2D<'a> {
    /// Borrow a slice as a field.
    pub fn borrowed(values: &'a [f64], rows: usize, cols: usize) -> GridResult<Self> {
        check_field_len(values.len(), rows, cols)?;
        Ok(Self {
            values: Cow::Borrowed(values),
            rows,
            cols,
        })
    }

    /// Take ownership of values as a field.
    pub fn owned(values: Vec<f64>, rows: usize, cols: usize) -> GridResult<Field2D<'static>> {
        check_field_len(values.len(), rows, cols)?;
        Ok(Field2D {
            values: Cow::Owned(values),
            rows,
            cols,
        })
    }

    /// Build a field from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> GridResult<Field2D<'static>> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(GridError::load("ragged rows in 2-D field"));
        }
        Field2D::owned(rows.into_iter().flatten().collect(), n_rows, n_cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether the values are borrowed from the source variable.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.values, Cow::Borrowed(_))
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// Iterate over rows as slices.
    pub fn row_slices(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, an empty field has no rows to yield anyway
        self.values.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Nested rows with non-finite cells mapped to `None`.
    pub fn to_nested(&self) -> Vec<Vec<Option<f64>>> {
        self.row_slices()
            .map(|row| {
                row.iter()
                    .map(|v| if v.is_finite() { Some(*v) } else { None })
                    .collect()
            })
            .collect()
    }
}

fn check_field_len(len: usize, rows: usize, cols: usize) -> GridResult<()> {
    if len != rows * cols {
        return Err(GridError::load(format!(
            "field of {}x{} needs {} values, got {}",
            rows,
            cols,
            rows * cols,
            len
        )));
    }
    Ok(())
}

/// A loaded dataset: dimensions, coordinate axes and data variables.
///
/// Grids are immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    dimensions: Vec<Dimension>,
    coordinates: Vec<Variable>,
    data_vars: Vec<Variable>,
    attributes: Attributes,
}

impl Grid {
    /// Start building a grid.
    pub fn builder() -> GridBuilder {
        GridBuilder::default()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn coordinates(&self) -> &[Variable] {
        &self.coordinates
    }

    pub fn data_vars(&self) -> &[Variable] {
        &self.data_vars
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Look up a declared coordinate variable.
    pub fn coordinate(&self, name: &str) -> Option<&Variable> {
        self.coordinates.iter().find(|v| v.name == name)
    }

    /// Look up a data variable.
    pub fn data_var(&self, name: &str) -> Option<&Variable> {
        self.data_vars.iter().find(|v| v.name == name)
    }

    /// Look up any variable, coordinates first.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.coordinate(name).or_else(|| self.data_var(name))
    }

    /// Length of a named dimension.
    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().find(|d| d.name == name).map(|d| d.len)
    }

    pub fn coordinate_names(&self) -> Vec<String> {
        self.coordinates.iter().map(|v| v.name.clone()).collect()
    }

    /// Names of all variables (coordinates, then data variables).
    pub fn variable_names(&self) -> Vec<String> {
        self.coordinates
            .iter()
            .chain(self.data_vars.iter())
            .map(|v| v.name.clone())
            .collect()
    }

    pub fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }
}

/// Builder for [`Grid`].
///
/// Dimensions referenced by variables are registered automatically; a
/// dimension that appears with two different lengths is rejected.
#[derive(Debug, Default)]
pub struct GridBuilder {
    dimensions: Vec<Dimension>,
    coordinates: Vec<Variable>,
    data_vars: Vec<Variable>,
    attributes: Attributes,
}

impl GridBuilder {
    /// Declare a dimension, possibly without any variable over it.
    pub fn dimension(mut self, name: impl Into<String>, len: usize) -> Self {
        self.dimensions.push(Dimension {
            name: name.into(),
            len,
        });
        self
    }

    /// Add a declared coordinate variable.
    pub fn coordinate(mut self, var: Variable) -> Self {
        self.coordinates.push(var);
        self
    }

    /// Add a data variable.
    pub fn data_var(mut self, var: Variable) -> Self {
        self.data_vars.push(var);
        self
    }

    /// Add a variable, classifying it as a coordinate when it is 1-D over a
    /// dimension with its own name.
    pub fn variable(self, var: Variable) -> Self {
        if var.is_dimension_coordinate() {
            self.coordinate(var)
        } else {
            self.data_var(var)
        }
    }

    /// Attach a global attribute.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Validate names and dimension lengths and build the grid.
    pub fn build(self) -> GridResult<Grid> {
        let mut dimensions: Vec<Dimension> = Vec::new();
        for dim in self.dimensions {
            register_dimension(&mut dimensions, &dim.name, dim.len)?;
        }

        let mut seen = std::collections::HashSet::new();
        for var in self.coordinates.iter().chain(self.data_vars.iter()) {
            if !seen.insert(var.name.as_str()) {
                return Err(GridError::load(format!(
                    "duplicate variable name '{}'",
                    var.name
                )));
            }
            for (dim, len) in var.dims.iter().zip(var.shape.iter()) {
                register_dimension(&mut dimensions, dim, *len)?;
            }
        }

        Ok(Grid {
            dimensions,
            coordinates: self.coordinates,
            data_vars: self.data_vars,
            attributes: self.attributes,
        })
    }
}

fn register_dimension(dimensions: &mut Vec<Dimension>, name: &str, len: usize) -> GridResult<()> {
    match dimensions.iter().find(|d| d.name == name) {
        Some(existing) if existing.len != len => Err(GridError::load(format!(
            "dimension '{}' has conflicting lengths {} and {}",
            name, existing.len, len
        ))),
        Some(_) => Ok(()),
        None => {
            dimensions.push(Dimension {
                name: name.to_string(),
                len,
            });
            Ok(())
        }
    }
}
