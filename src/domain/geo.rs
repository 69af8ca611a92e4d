//! Minimal GeoJSON-shaped types for exchanging locations and geometry
//! between clients and the satellite data services.

use crate::utils::error::Result;
use crate::utils::validation::{validate_latitude, validate_longitude};
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A geographic position, serialized as the GeoJSON `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

impl Position {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        validate_longitude(longitude)?;
        validate_latitude(latitude)?;
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.longitude)?;
        seq.serialize_element(&self.latitude)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PositionVisitor;

        impl<'de> Visitor<'de> for PositionVisitor {
            type Value = Position;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a [longitude, latitude] coordinate pair")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Position, A::Error> {
                let longitude: f64 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                let latitude: f64 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                // GeoJSON allows a trailing altitude; drain it if present
                while seq.next_element::<f64>()?.is_some() {}
                Position::new(longitude, latitude).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_seq(PositionVisitor)
    }
}

/// The geometry kinds the satellite data source works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    kind: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            kind: feature_type(),
            geometry,
            properties: HashMap::new(),
        }
    }

    pub fn with_properties(
        geometry: Geometry,
        properties: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            kind: feature_type(),
            geometry,
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_type")]
    kind: String,
    pub features: Vec<Feature>,
}

fn feature_collection_type() -> String {
    "FeatureCollection".to_string()
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: feature_collection_type(),
            features,
        }
    }

    /// Wraps bare positions as point features without properties.
    pub fn from_positions(positions: &[Position]) -> Self {
        let features = positions
            .iter()
            .map(|p| Feature::new(Geometry::Point { coordinates: *p }))
            .collect();
        Self::new(features)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_validates_ranges() {
        assert!(Position::new(8.57, 50.03).is_ok());
        assert!(Position::new(-181.0, 0.0).is_err());
        assert!(Position::new(0.0, 90.5).is_err());
    }

    #[test]
    fn test_position_geojson_layout() {
        let position = Position::new(8.57, 50.03).unwrap();
        let json = serde_json::to_value(&position).unwrap();
        assert_eq!(json, serde_json::json!([8.57, 50.03]));

        let parsed: Position = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, position);
    }

    #[test]
    fn test_position_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Position>("[181.0, 50.0]").is_err());
        assert!(serde_json::from_str::<Position>("[8.57, -90.5]").is_err());

        let collection = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [8.57, 95.0]},
                "properties": {}
            }]
        });
        assert!(serde_json::from_value::<FeatureCollection>(collection).is_err());
    }

    #[test]
    fn test_position_accepts_altitude() {
        let parsed: Position = serde_json::from_str("[8.57, 50.03, 111.0]").unwrap();
        assert_eq!(parsed.longitude, 8.57);
        assert_eq!(parsed.latitude, 50.03);
    }

    #[test]
    fn test_feature_collection_round_trip() {
        let positions = vec![
            Position::new(8.57, 50.03).unwrap(),
            Position::new(13.4, 52.52).unwrap(),
        ];
        let collection = FeatureCollection::from_positions(&positions);

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
        assert_eq!(
            json["features"][0]["geometry"]["coordinates"],
            serde_json::json!([8.57, 50.03])
        );

        let parsed: FeatureCollection = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, collection);
    }

    #[test]
    fn test_polygon_geometry() {
        let ring = vec![
            Position::new(0.0, 0.0).unwrap(),
            Position::new(1.0, 0.0).unwrap(),
            Position::new(1.0, 1.0).unwrap(),
            Position::new(0.0, 0.0).unwrap(),
        ];
        let geometry = Geometry::Polygon {
            coordinates: vec![ring],
        };

        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "Polygon");

        let parsed: Geometry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, geometry);
    }
}
