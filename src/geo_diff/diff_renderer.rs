use geojson::{Feature, GeoJson, Geometry, JsonValue};

use super::feature_collection::FeatureCollection;
use super::geo_diff_types::{Match, PropertyMap};
use super::matcher::MatchTable;
use super::normalized_record::NormalizedRecord;

const UNMATCHED_DISTANCE: i64 = -1;

#[inline]
fn round_distance(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/**
 * Polygons keep their source geometry, points are rebuilt from the coordinate.
 * Records without a coordinate get a null geometry.
 */
fn diff_geometry(record: &NormalizedRecord) -> Option<Geometry> {
    if let Some(original) = record.original_geometry() {
        return Some(original.clone());
    }

    record.coordinate().map(|coordinate| {
        Geometry::new(geojson::Value::Point(vec![coordinate.x(), coordinate.y()]))
    })
}

fn diff_properties(
    record_a: &NormalizedRecord,
    matched: Option<(&Match, &NormalizedRecord)>,
) -> PropertyMap {
    let mut properties = PropertyMap::new();

    if let Some(attributes) = record_a.attributes() {
        for (key, value) in attributes {
            properties.insert(format!("a.{}", key), value.clone());
        }
    }

    match matched {
        Some((found, record_b)) => {
            if let Some(attributes) = record_b.attributes() {
                for (key, value) in attributes {
                    properties.insert(format!("b.{}", key), value.clone());
                }
            }

            properties.insert(
                "a->b.distance".to_owned(),
                JsonValue::from(round_distance(found.distance)),
            );

            if let Some(alternates) = &found.alternates {
                properties.insert("a->b.near".to_owned(), JsonValue::from(alternates.join(" ")));
            }
        }
        None => {
            properties.insert("a->b.distance".to_owned(), JsonValue::from(UNMATCHED_DISTANCE));
        }
    }

    properties
}

/// One feature per record of A, in A's order, annotated with its match in B.
pub fn diff_feature_collection(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
) -> geojson::FeatureCollection {
    let features = a
        .iter()
        .enumerate()
        .map(|(index_a, record_a)| {
            let matched = table
                .get(index_a)
                .and_then(|found| b.get(found.b_index).map(|record_b| (found, record_b)));

            Feature {
                bbox: None,
                geometry: diff_geometry(record_a),
                id: None,
                properties: Some(diff_properties(record_a, matched)),
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// The diff as indented GeoJSON text.
pub fn diff_geojson_string(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
) -> Result<String, serde_json::Error> {
    let geo_json = GeoJson::FeatureCollection(diff_feature_collection(a, b, table));

    serde_json::to_string_pretty(&geo_json)
}
