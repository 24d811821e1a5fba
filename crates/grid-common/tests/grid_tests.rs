//! Tests for the grid model and layer table.

use grid_common::{AttrValue, Field2D, Grid, GridError, LayerDescriptor, Variable};

fn habitat_grid() -> Grid {
    Grid::builder()
        .coordinate(Variable::axis("lat", vec![-10.0, 0.0, 10.0]))
        .coordinate(Variable::axis("lon", vec![100.0, 110.0]))
        .data_var(
            Variable::grid2d(
                "H_index",
                "lat",
                "lon",
                3,
                2,
                vec![0.1, 0.2, 0.3, f64::NAN, 0.9, 0.5],
            )
            .unwrap()
            .with_attribute("units", "1")
            .with_attribute("long_name", "Habitat suitability index"),
        )
        .attribute("title", "habitat")
        .build()
        .unwrap()
}

// ============================================================================
// Grid construction tests
// ============================================================================

#[test]
fn test_builder_registers_dimensions() {
    let grid = habitat_grid();
    assert_eq!(grid.dimension_names(), vec!["lat", "lon"]);
    assert_eq!(grid.dimension_len("lat"), Some(3));
    assert_eq!(grid.dimension_len("lon"), Some(2));
}

#[test]
fn test_explicit_dimension_without_variable() {
    let grid = Grid::builder()
        .dimension("lat", 4)
        .dimension("lon", 5)
        .build()
        .unwrap();
    assert!(grid.coordinates().is_empty());
    assert_eq!(grid.dimension_len("lon"), Some(5));
}

#[test]
fn test_duplicate_variable_rejected() {
    let err = Grid::builder()
        .coordinate(Variable::axis("lat", vec![0.0]))
        .data_var(Variable::new("lat", vec!["y".into()], vec![1], vec![0.0]).unwrap())
        .build()
        .unwrap_err();
    assert!(matches!(err, GridError::Load(_)));
}

#[test]
fn test_global_attributes() {
    let grid = habitat_grid();
    assert_eq!(
        grid.attributes().get("title"),
        Some(&AttrValue::Text("habitat".to_string()))
    );
}

// ============================================================================
// Variable and field tests
// ============================================================================

#[test]
fn test_text_attributes() {
    let grid = habitat_grid();
    let var = grid.data_var("H_index").unwrap();
    assert_eq!(var.text_attribute("units"), Some("1"));
    assert_eq!(
        var.text_attribute("long_name"),
        Some("Habitat suitability index")
    );
    assert_eq!(var.text_attribute("missing"), None);
}

#[test]
fn test_field_view_of_2d_variable() {
    let grid = habitat_grid();
    let field = grid.data_var("H_index").unwrap().field().unwrap();
    assert_eq!(field.len(), 6);
    assert_eq!(field.get(2, 0), Some(0.9));
    assert!(field.get(1, 1).unwrap().is_nan());
}

#[test]
fn test_field_row_slices() {
    let field = Field2D::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let rows: Vec<&[f64]> = field.row_slices().collect();
    assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
}

#[test]
fn test_ragged_rows_rejected() {
    assert!(Field2D::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
}

#[test]
fn test_empty_field() {
    let field = Field2D::owned(vec![], 0, 0).unwrap();
    assert!(field.is_empty());
    assert_eq!(field.row_slices().count(), 0);
}

// ============================================================================
// Layer descriptor tests
// ============================================================================

#[test]
fn test_descriptor_builder() {
    let layer = LayerDescriptor::new("habitat_index_H", "habitat.nc")
        .with_description("Habitat index")
        .with_size_mb(3.2);
    assert_eq!(layer.name, "habitat_index_H");
    assert_eq!(layer.filename, "habitat.nc");
    assert_eq!(layer.description.as_deref(), Some("Habitat index"));
    assert_eq!(layer.size_mb, Some(3.2));
}
