//! The pre-ranked hotspot table (`hotspots_H_top20.csv`).
//!
//! The table is produced offline. Its first column is an integer row index;
//! every other column is numeric and the header must name `lat`, `lon` and
//! `H`. Rows are returned in file order without filtering.

use std::path::Path;

use grid_common::{GridError, GridResult};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Columns every hotspot table must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["lat", "lon", "H"];

/// One row of the hotspot table.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotRecord {
    /// Header of the index column (often empty)
    pub index_name: String,
    pub index: i64,
    /// Remaining columns in header order
    pub columns: Vec<(String, f64)>,
}

impl HotspotRecord {
    /// Value of a named column.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| *v)
    }

    pub fn lat(&self) -> Option<f64> {
        self.get("lat")
    }

    pub fn lon(&self) -> Option<f64> {
        self.get("lon")
    }

    /// Habitat index of the row.
    pub fn h(&self) -> Option<f64> {
        self.get("H")
    }
}

// Serialized as a flat object in header order.
impl Serialize for HotspotRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry(&self.index_name, &self.index)?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Read and parse the hotspot table. A missing file is NotFound.
pub fn load_hotspots(path: &Path) -> GridResult<Vec<HotspotRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => GridError::not_found(format!(
            "File {} not found",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        )),
        _ => GridError::load(format!("cannot read {}: {}", path.display(), e)),
    })?;
    parse_hotspots(&text)
}

/// Parse the hotspot table from CSV text.
///
/// Fields may be quoted and are trimmed. Blank lines are skipped. Any
/// structural problem is a load error that names the offending line
/// (1-based).
pub fn parse_hotspots(text: &str) -> GridResult<Vec<HotspotRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(text.as_bytes());

    let header_record = reader.headers().map_err(csv_error)?.clone();
    if header_record.is_empty() {
        return Err(GridError::load(
            "hotspot table is empty, a header row is required",
        ));
    }
    let header_line = line_of(&header_record);
    let header: Vec<String> = header_record
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if header.len() < 2 {
        return Err(GridError::load(format!(
            "line {}: header needs an index column and at least one value column",
            header_line
        )));
    }
    for required in REQUIRED_COLUMNS {
        if !header[1..].iter().any(|h| h == required) {
            return Err(GridError::load(format!(
                "line {}: header is missing required column '{}'",
                header_line, required
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let line_no = line_of(&row);

        let index_cell = row.get(0).unwrap_or_default();
        let index = index_cell.parse::<i64>().map_err(|_| {
            GridError::load(format!(
                "line {}: index '{}' is not an integer",
                line_no, index_cell
            ))
        })?;

        let columns = header[1..]
            .iter()
            .zip(row.iter().skip(1))
            .map(|(name, cell)| {
                cell.parse::<f64>()
                    .map(|v| (name.clone(), v))
                    .map_err(|_| {
                        GridError::load(format!(
                            "line {}: column '{}' value '{}' is not numeric",
                            line_no, name, cell
                        ))
                    })
            })
            .collect::<GridResult<Vec<_>>>()?;

        records.push(HotspotRecord {
            index_name: header[0].clone(),
            index,
            columns,
        });
    }

    Ok(records)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(csv::Position::line).unwrap_or(0)
}

fn csv_error(err: csv::Error) -> GridError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => GridError::load(format!(
            "line {}: expected {} columns, found {}",
            pos.as_ref().map(csv::Position::line).unwrap_or(0),
            expected_len,
            len
        )),
        _ => match err.position() {
            Some(pos) => GridError::load(format!("line {}: {}", pos.line(), err)),
            None => GridError::load(format!("hotspot table: {}", err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = ",lat,lon,H\n12,-33.5,151.25,0.93\n\n7,-34.0,150.75,0.88\n";

    #[test]
    fn test_parse_rows_in_file_order() {
        let rows = parse_hotspots(TABLE).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 12);
        assert_eq!(rows[0].lat(), Some(-33.5));
        assert_eq!(rows[1].lon(), Some(150.75));
        assert_eq!(rows[1].h(), Some(0.88));
    }

    #[test]
    fn test_serializes_flat_in_header_order() {
        let rows = parse_hotspots(TABLE).unwrap();
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(json, r#"{"":12,"lat":-33.5,"lon":151.25,"H":0.93}"#);
    }

    #[test]
    fn test_non_integer_index_rejected() {
        let err = parse_hotspots("idx,lat,lon,H\n1.5,0,0,0.9\n").unwrap_err();
        assert!(matches!(err, GridError::Load(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let err = parse_hotspots("idx,lat,lon,H\n1,north,0,0.9\n").unwrap_err();
        assert!(err.to_string().contains("'lat'"));
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let err = parse_hotspots("idx,lat,lon,H\n1,0,0\n").unwrap_err();
        assert!(err.to_string().contains("expected 4 columns, found 3"));
    }

    #[test]
    fn test_header_requirements() {
        assert!(parse_hotspots("").is_err());
        assert!(parse_hotspots("\n\n").is_err());
        let err = parse_hotspots("idx,lat,lon\n1,0,0\n").unwrap_err();
        assert!(err.to_string().contains("'H'"));
        // The index column does not count as a value column.
        assert!(parse_hotspots("lat,lon,H\n1,0,0\n").is_err());
    }

    #[test]
    fn test_quoted_fields_are_unquoted() {
        let text = "\"\",\"lat\",\"lon\",\"H\"\n1287,\"-33.5\", 151.25 ,0.93\n";
        let rows = parse_hotspots(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index_name, "");
        assert_eq!(rows[0].index, 1287);
        assert_eq!(rows[0].lat(), Some(-33.5));
        assert_eq!(rows[0].lon(), Some(151.25));
    }

    #[test]
    fn test_error_line_counts_blank_lines() {
        let err = parse_hotspots("idx,lat,lon,H\n1,0,0,0.5\n\n2,0,x,0.5\n").unwrap_err();
        assert!(err.to_string().contains("line 4"), "{err}");
    }

    #[test]
    fn test_header_only_table_is_empty() {
        assert!(parse_hotspots("i,lat,lon,H\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_hotspots(Path::new("/nonexistent/hotspots_H_top20.csv")).unwrap_err();
        assert!(matches!(err, GridError::NotFound(_)));
        assert!(err.to_string().contains("hotspots_H_top20.csv"));
    }
}
