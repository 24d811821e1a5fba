//! Common types shared across the ocean habitat data services.

pub mod error;
pub mod grid;
pub mod layer;

pub use error::{GridError, GridResult};
pub use grid::{AttrValue, Attributes, Dimension, Field2D, Grid, GridBuilder, Variable};
pub use layer::{parse_layer_table, LayerDescriptor, LayerTable};
