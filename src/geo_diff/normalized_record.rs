use geo::algorithm::centroid::Centroid;
use geo_types;
use geojson::{Geometry, JsonObject, JsonValue};

use log::debug;

use super::geo_diff_types::PropertyMap;

// Overpass exports keep the attributes in "tags" instead of "properties".
const TAGS_CONTAINER: &str = "tags";
const PROPERTIES_CONTAINER: &str = "properties";

/// One input feature reduced to a single representative coordinate.
///
/// Coordinates are stored as `geo_types::Point` (x = longitude, y = latitude).
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedRecord {
    Point {
        coordinate: geo_types::Point<f64>,
        attributes: Option<PropertyMap>,
    },
    /// The coordinate is the centroid of the outer ring. The source geometry
    /// is kept so the diff can render the real shape.
    Polygon {
        coordinate: geo_types::Point<f64>,
        attributes: Option<PropertyMap>,
        original_geometry: Geometry,
    },
    /// A geometry type other than Point or Polygon. Never matches.
    Unsupported { geometry_type: String },
    /// No geometry, no coordinates or no type tag. Never matches.
    Invalid,
}

impl NormalizedRecord {
    pub fn from_json(feature: &JsonValue) -> NormalizedRecord {
        let feature = match feature.as_object() {
            Some(feature) if !feature.is_empty() => feature,
            _ => return NormalizedRecord::Invalid,
        };

        let geometry_object = match feature.get("geometry").and_then(JsonValue::as_object) {
            Some(geometry) if geometry.contains_key("coordinates") => geometry,
            _ => return NormalizedRecord::Invalid,
        };

        if !feature.contains_key("type") {
            return NormalizedRecord::Invalid;
        }

        let geometry_type = match geometry_object.get("type").and_then(JsonValue::as_str) {
            Some(geometry_type) => geometry_type,
            None => return NormalizedRecord::Invalid,
        };

        if geometry_type != "Point" && geometry_type != "Polygon" {
            return NormalizedRecord::Unsupported {
                geometry_type: geometry_type.to_owned(),
            };
        }

        let geometry = match Geometry::from_json_object(geometry_object.clone()) {
            Ok(geometry) => geometry,
            Err(err) => {
                debug!("Ignoring malformed {} geometry: {}", geometry_type, err);
                return NormalizedRecord::Invalid;
            }
        };

        match geometry.value {
            geojson::Value::Point(ref position) => {
                if position.len() < 2 {
                    return NormalizedRecord::Invalid;
                }

                let container = if feature.contains_key(TAGS_CONTAINER) {
                    TAGS_CONTAINER
                } else {
                    PROPERTIES_CONTAINER
                };

                NormalizedRecord::Point {
                    coordinate: geo_types::Point::new(position[0], position[1]),
                    attributes: read_attributes(feature, container),
                }
            }
            geojson::Value::Polygon(ref rings) => {
                let centroid = rings.first().and_then(|ring| outer_ring_centroid(ring));

                match centroid {
                    Some(coordinate) => NormalizedRecord::Polygon {
                        coordinate,
                        attributes: read_attributes(feature, PROPERTIES_CONTAINER),
                        original_geometry: geometry.clone(),
                    },
                    None => NormalizedRecord::Invalid,
                }
            }
            _ => NormalizedRecord::Invalid,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.coordinate().is_some()
    }

    #[inline]
    pub fn coordinate(&self) -> Option<geo_types::Point<f64>> {
        match self {
            NormalizedRecord::Point { coordinate, .. } => Some(*coordinate),
            NormalizedRecord::Polygon { coordinate, .. } => Some(*coordinate),
            _ => None,
        }
    }

    #[inline]
    pub fn attributes(&self) -> Option<&PropertyMap> {
        match self {
            NormalizedRecord::Point { attributes, .. } => attributes.as_ref(),
            NormalizedRecord::Polygon { attributes, .. } => attributes.as_ref(),
            _ => None,
        }
    }

    #[inline]
    pub fn original_geometry(&self) -> Option<&Geometry> {
        match self {
            NormalizedRecord::Polygon {
                original_geometry, ..
            } => Some(original_geometry),
            _ => None,
        }
    }

    /// Attribute rendered as plain text: strings unquoted, anything else as JSON.
    pub fn attribute_text(&self, key: &str) -> Option<String> {
        self.attributes()
            .and_then(|attributes| attributes.get(key))
            .map(json_text)
    }
}

pub fn json_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn read_attributes(feature: &JsonObject, container: &str) -> Option<PropertyMap> {
    feature
        .get(container)
        .and_then(JsonValue::as_object)
        .filter(|attributes| !attributes.is_empty())
        .cloned()
}

fn outer_ring_centroid(ring: &[geojson::Position]) -> Option<geo_types::Point<f64>> {
    let exterior: Vec<(f64, f64)> = ring
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| (position[0], position[1]))
        .collect();

    if exterior.is_empty() {
        return None;
    }

    geo_types::Polygon::new(geo_types::LineString::from(exterior), vec![]).centroid()
}
