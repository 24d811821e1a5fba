//! Layer descriptors from the metadata table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A logical layer as declared in `metadata.json`.
///
/// The logical name is the key of the table entry and is not part of the
/// serialized descriptor. Keys other than `filename`, `description` and
/// `size_MB` are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Logical layer name (table key)
    #[serde(skip)]
    pub name: String,

    /// Backing file name, relative to the data directory
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Approximate file size in megabytes
    #[serde(rename = "size_MB", default, skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LayerDescriptor {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            description: None,
            size_mb: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_size_mb(mut self, size_mb: f64) -> Self {
        self.size_mb = Some(size_mb);
        self
    }
}

/// Layer table ordered by logical name.
pub type LayerTable = BTreeMap<String, LayerDescriptor>;

/// Parse the metadata table from its JSON text.
///
/// The document must be an object of name -> descriptor. Any structural
/// problem, including a descriptor without `filename`, is a config error.
pub fn parse_layer_table(json: &str) -> GridResult<LayerTable> {
    let raw: BTreeMap<String, LayerDescriptor> = serde_json::from_str(json)
        .map_err(|e| GridError::config(format!("invalid metadata table: {}", e)))?;

    Ok(raw
        .into_iter()
        .map(|(name, mut descriptor)| {
            descriptor.name = name.clone();
            (name, descriptor)
        })
        .collect())
}
