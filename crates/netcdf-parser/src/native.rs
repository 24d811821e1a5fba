//! Native NetCDF reading using the netcdf library.
//!
//! File access is split from grid assembly: [`read_grid`] pulls raw arrays
//! and attributes out of libnetcdf, and [`assemble_grid`] turns them into a
//! [`Grid`] without touching the filesystem.

use std::path::Path;
use std::sync::Once;

use grid_common::{AttrValue, Attributes, Grid, Variable};
use tracing::{debug, instrument};

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics even when a missing
/// optional attribute is handled on the Rust side. Call this once before
/// any NetCDF operation; repeated calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// A variable as stored in the file, before unpacking.
#[derive(Debug, Clone)]
pub struct RawVariable {
    pub name: String,
    /// (dimension name, length) pairs in storage order
    pub dims: Vec<(String, usize)>,
    pub values: Vec<f64>,
    pub attributes: Attributes,
}

/// Read a NetCDF file into a [`Grid`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_grid(path: impl AsRef<Path>) -> NetCdfResult<Grid> {
    silence_hdf5_errors();
    let path = path.as_ref();

    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let dimensions: Vec<(String, usize)> = file
        .dimensions()
        .map(|d| (d.name().to_string(), d.len()))
        .collect();

    let mut variables = Vec::new();
    for var in file.variables() {
        let name = var.name().to_string();
        let dims: Vec<(String, usize)> = var
            .dimensions()
            .iter()
            .map(|d| (d.name().to_string(), d.len()))
            .collect();
        let values: Vec<f64> = var.get_values::<f64, _>(..).map_err(|e| {
            NetCdfError::InvalidFormat(format!("Failed to read variable '{}': {}", name, e))
        })?;
        let attributes = collect_attributes(var.attributes());
        variables.push(RawVariable {
            name,
            dims,
            values,
            attributes,
        });
    }

    let global = collect_attributes(file.attributes());
    let grid = assemble_grid(&dimensions, variables, global)?;
    debug!(
        dimensions = ?grid.dimension_names(),
        variables = grid.variable_names().len(),
        "Read NetCDF grid"
    );
    Ok(grid)
}

/// Build a [`Grid`] from raw file contents.
///
/// Every variable is unpacked with [`unpack_values`]. A 1-D variable over a
/// dimension of its own name becomes a coordinate; everything else is a
/// data variable. Dimensions are declared in file order, including ones no
/// variable uses.
pub fn assemble_grid(
    dimensions: &[(String, usize)],
    variables: Vec<RawVariable>,
    global: Attributes,
) -> NetCdfResult<Grid> {
    let mut builder = Grid::builder();
    for (name, len) in dimensions {
        builder = builder.dimension(name.clone(), *len);
    }
    for (key, value) in global {
        builder = builder.attribute(key, value);
    }

    for raw in variables {
        let values = unpack_values(raw.values, &raw.attributes);
        let (dim_names, shape): (Vec<String>, Vec<usize>) = raw.dims.into_iter().unzip();
        let var = Variable::new(raw.name, dim_names, shape, values)?.with_attributes(raw.attributes);
        builder = builder.variable(var);
    }

    Ok(builder.build()?)
}

/// Apply CF packing conventions to raw values.
///
/// Cells equal to `_FillValue` or `missing_value` become `NaN`; the rest are
/// mapped through `value * scale_factor + add_offset`.
pub fn unpack_values(raw: Vec<f64>, attributes: &Attributes) -> Vec<f64> {
    let fill = number_attr(attributes, "_FillValue");
    let missing = number_attr(attributes, "missing_value");
    let scale = number_attr(attributes, "scale_factor").unwrap_or(1.0);
    let offset = number_attr(attributes, "add_offset").unwrap_or(0.0);

    if fill.is_none() && missing.is_none() && scale == 1.0 && offset == 0.0 {
        return raw;
    }

    raw.into_iter()
        .map(|v| {
            if Some(v) == fill || Some(v) == missing {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

fn number_attr(attributes: &Attributes, name: &str) -> Option<f64> {
    attributes.get(name).and_then(AttrValue::as_number)
}

fn collect_attributes<'a>(attrs: impl Iterator<Item = netcdf::Attribute<'a>>) -> Attributes {
    let mut out = Attributes::new();
    for attr in attrs {
        match attr.value() {
            Ok(value) => {
                if let Some(converted) = convert_attribute(value) {
                    out.insert(attr.name().to_string(), converted);
                }
            }
            Err(e) => debug!(attribute = attr.name(), error = %e, "Skipping unreadable attribute"),
        }
    }
    out
}

fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttrValue> {
    use netcdf::AttributeValue as V;

    fn many<T: Into<f64>>(values: Vec<T>) -> AttrValue {
        AttrValue::Numbers(values.into_iter().map(Into::into).collect())
    }

    Some(match value {
        V::Str(s) => AttrValue::Text(s),
        V::Strs(s) => AttrValue::Text(s.join(", ")),
        V::Doubles(v) => AttrValue::Numbers(v),
        V::Floats(v) => many(v),
        V::Ints(v) => many(v),
        V::Shorts(v) => many(v),
        V::Uints(v) => many(v),
        V::Ushorts(v) => many(v),
        V::Schars(v) => many(v),
        V::Uchars(v) => many(v),
        V::Longlongs(v) => AttrValue::Numbers(v.into_iter().map(|x| x as f64).collect()),
        V::Ulonglongs(v) => AttrValue::Numbers(v.into_iter().map(|x| x as f64).collect()),
        V::Double(x) => AttrValue::Number(x),
        V::Float(x) => AttrValue::Number(x.into()),
        V::Int(x) => AttrValue::Number(x.into()),
        V::Short(x) => AttrValue::Number(x.into()),
        V::Uint(x) => AttrValue::Number(x.into()),
        V::Ushort(x) => AttrValue::Number(x.into()),
        V::Schar(x) => AttrValue::Number(x.into()),
        V::Uchar(x) => AttrValue::Number(x.into()),
        V::Longlong(x) => AttrValue::Number(x as f64),
        V::Ulonglong(x) => AttrValue::Number(x as f64),
        #[allow(unreachable_patterns)]
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, f64)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), AttrValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_unpack_without_packing_is_identity() {
        let raw = vec![1.0, 2.0, 3.0];
        assert_eq!(unpack_values(raw.clone(), &Attributes::new()), raw);
    }

    #[test]
    fn test_unpack_applies_fill_and_scale() {
        let attributes = attrs(&[
            ("_FillValue", -999.0),
            ("scale_factor", 0.5),
            ("add_offset", 10.0),
        ]);
        let out = unpack_values(vec![2.0, -999.0, 0.0], &attributes);
        assert_eq!(out[0], 11.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 10.0);
    }

    #[test]
    fn test_unpack_missing_value() {
        let out = unpack_values(vec![1.0, 1e20], &attrs(&[("missing_value", 1e20)]));
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
    }

    #[test]
    fn test_assemble_classifies_coordinates() {
        let dims = vec![("lat".to_string(), 2), ("lon".to_string(), 2)];
        let vars = vec![
            RawVariable {
                name: "lat".into(),
                dims: vec![("lat".into(), 2)],
                values: vec![0.0, 1.0],
                attributes: Attributes::new(),
            },
            RawVariable {
                name: "sst".into(),
                dims: vec![("lat".into(), 2), ("lon".into(), 2)],
                values: vec![1.0, 2.0, 3.0, -1.0],
                attributes: attrs(&[("_FillValue", -1.0)]),
            },
        ];
        let grid = assemble_grid(&dims, vars, Attributes::new()).unwrap();
        assert_eq!(grid.coordinate_names(), vec!["lat"]);
        assert!(grid.coordinate("lon").is_none());
        assert_eq!(grid.dimension_len("lon"), Some(2));
        let sst = grid.data_var("sst").unwrap();
        assert!(sst.values()[3].is_nan());
        assert_eq!(sst.attributes().get("_FillValue"), Some(&AttrValue::Number(-1.0)));
    }

    #[test]
    fn test_assemble_rejects_bad_shape() {
        let vars = vec![RawVariable {
            name: "sst".into(),
            dims: vec![("lat".into(), 2), ("lon".into(), 2)],
            values: vec![1.0],
            attributes: Attributes::new(),
        }];
        assert!(matches!(
            assemble_grid(&[], vars, Attributes::new()),
            Err(NetCdfError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_grid("/nonexistent/grid.nc").unwrap_err();
        assert!(matches!(err, NetCdfError::IoError(_)));
    }
}
