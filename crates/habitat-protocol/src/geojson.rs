//! GeoJSON types for the habitat zone collection.
//!
//! Each zone is a closed rectangular polygon around a grid cell center,
//! with the cell's habitat index and labels as properties.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A GeoJSON FeatureCollection of habitat zones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<HabitatFeature>,

    /// Extraction summary; absent for collections read from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CollectionMetadata>,
}

impl FeatureCollection {
    pub fn new(features: Vec<HabitatFeature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: CollectionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// One habitat zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitatFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: Geometry,

    pub properties: HabitatProperties,
}

impl HabitatFeature {
    /// A zone with an explicit exterior ring of `[lon, lat]` pairs.
    pub fn polygon(ring: Vec<[f64; 2]>, properties: HabitatProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::Polygon {
                coordinates: vec![ring],
            },
            properties,
        }
    }
}

/// GeoJSON geometry of a zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Linear rings of [longitude, latitude] pairs; the first is the exterior.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

impl Geometry {
    /// Exterior ring of a polygon, if any.
    pub fn exterior(&self) -> Option<&[[f64; 2]]> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
        }
    }
}

/// Properties of a habitat zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitatProperties {
    #[serde(rename = "H_index")]
    pub h_index: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// "high" or "medium"
    pub habitat_potential: String,
    /// Percentage in [0, 100]
    pub confidence: f64,
}

/// Summary attached to a generated collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionMetadata {
    /// Number of features returned.
    pub total_zones: usize,
    /// Number of cells that passed the threshold.
    pub total_available: usize,
    pub threshold: f64,
    pub max_features: usize,
    /// RFC 3339 generation timestamp.
    pub generated_at: String,
    /// Backing file the zones were extracted from.
    pub source: String,
}

impl CollectionMetadata {
    pub fn new(
        total_zones: usize,
        total_available: usize,
        threshold: f64,
        max_features: usize,
        source: impl Into<String>,
    ) -> Self {
        Self {
            total_zones,
            total_available,
            threshold,
            max_features,
            generated_at: format_timestamp(Utc::now()),
            source: source.into(),
        }
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = format_timestamp(at);
        self
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn square(lat: f64, lon: f64, half: f64) -> Vec<[f64; 2]> {
        let sw = [lon - half, lat - half];
        vec![sw, [lon + half, lat - half], [lon + half, lat + half], [lon - half, lat + half], sw]
    }

    fn props(h: f64) -> HabitatProperties {
        HabitatProperties {
            h_index: h,
            latitude: 10.0,
            longitude: 20.0,
            habitat_potential: "high".to_string(),
            confidence: h * 100.0,
        }
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let feature = HabitatFeature::polygon(square(10.0, 20.0, 0.125), props(0.9));
        let ring = feature.geometry.exterior().unwrap();

        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], [19.875, 9.875]);
        assert_eq!(ring[2], [20.125, 10.125]);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn test_feature_serialization() {
        let feature = HabitatFeature::polygon(square(10.0, 20.0, 0.125), props(0.9));
        let json = serde_json::to_value(&feature).unwrap();

        assert_eq!(json["type"], "Feature");
        assert_eq!(json["geometry"]["type"], "Polygon");
        assert_eq!(json["geometry"]["coordinates"][0][1][0], 20.125);
        assert_eq!(json["properties"]["H_index"], 0.9);
        assert_eq!(json["properties"]["habitat_potential"], "high");
    }

    #[test]
    fn test_collection_metadata() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let collection = FeatureCollection::new(vec![]).with_metadata(
            CollectionMetadata::new(0, 0, 0.1, 1000, "habitat_index_H.nc").with_generated_at(at),
        );
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().unwrap().len(), 0);
        assert_eq!(json["metadata"]["generated_at"], "2024-03-01T12:00:00.000Z");
        assert_eq!(json["metadata"]["source"], "habitat_index_H.nc");
        assert_eq!(json["metadata"]["max_features"], 1000);
    }

    #[test]
    fn test_collection_without_metadata_omits_key() {
        let json = serde_json::to_string(&FeatureCollection::new(vec![])).unwrap();
        assert_eq!(json, r#"{"type":"FeatureCollection","features":[]}"#);
    }

    #[test]
    fn test_empty_polygon_has_no_exterior() {
        let geometry = Geometry::Polygon { coordinates: vec![] };
        assert!(geometry.exterior().is_none());
    }
}
