use failure::Fail;
use geojson::JsonValue;

use std::fs::File;
use std::io;
use std::ops::Index;
use std::path;
use std::slice;

use super::normalized_record::NormalizedRecord;

use log::{info, warn};

// Overpass exports keep the features in "elements" instead of "features".
const ELEMENTS_CONTAINER: &str = "elements";
const FEATURES_CONTAINER: &str = "features";

#[derive(Debug, Fail)]
pub enum DatasetError {
    #[fail(display = "I/O error: {}", _0)]
    Io(io::Error),
    #[fail(display = "JSON error: {}", _0)]
    Json(serde_json::Error),
    #[fail(display = "Document is not a JSON object")]
    NotAnObject,
    #[fail(display = "Neither \"elements\" nor \"features\" found in document")]
    FeatureContainerNotFound,
    #[fail(display = "\"{}\" is not an array", _0)]
    FeatureContainerNotAnArray(&'static str),
}

impl From<io::Error> for DatasetError {
    fn from(err: io::Error) -> DatasetError {
        DatasetError::Io(err)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> DatasetError {
        info!("Error parsing JSON document: {}", err);
        DatasetError::Json(err)
    }
}

/// Normalized records of one dataset, in input order.
///
/// The position of a record is its only identity: `A3` is always the fourth
/// feature of the source document, valid or not.
#[derive(Clone, Debug)]
pub struct FeatureCollection {
    alias: String,
    records: Vec<NormalizedRecord>,
}

impl FeatureCollection {
    pub fn new<P: AsRef<path::Path>>(
        alias: &str,
        json_path: P,
    ) -> Result<FeatureCollection, DatasetError> {
        let file = File::open(&json_path)?;
        let buf_reader = io::BufReader::new(file);

        FeatureCollection::from_reader(alias, buf_reader)
    }

    pub fn from_reader<R: io::Read>(
        alias: &str,
        reader: R,
    ) -> Result<FeatureCollection, DatasetError> {
        let document: JsonValue = serde_json::from_reader(reader)?;

        FeatureCollection::from_json(alias, document)
    }

    pub fn new_from_string(alias: &str, json_str: &str) -> Result<FeatureCollection, DatasetError> {
        let document: JsonValue = serde_json::from_str(json_str)?;

        FeatureCollection::from_json(alias, document)
    }

    pub fn from_json(alias: &str, document: JsonValue) -> Result<FeatureCollection, DatasetError> {
        let document = match document {
            JsonValue::Object(object) => object,
            _ => return Err(DatasetError::NotAnObject),
        };

        let container = if document.contains_key(ELEMENTS_CONTAINER) {
            ELEMENTS_CONTAINER
        } else if document.contains_key(FEATURES_CONTAINER) {
            FEATURES_CONTAINER
        } else {
            return Err(DatasetError::FeatureContainerNotFound);
        };

        let features = document[container]
            .as_array()
            .ok_or(DatasetError::FeatureContainerNotAnArray(container))?;

        let records: Vec<NormalizedRecord> =
            features.iter().map(NormalizedRecord::from_json).collect();

        let collection = FeatureCollection {
            alias: alias.to_owned(),
            records,
        };

        let unusable = collection.unusable_count();
        info!(
            "Dataset {}: {} features loaded from \"{}\" ({} unusable)",
            collection.alias,
            collection.len(),
            container,
            unusable
        );
        if unusable > 0 {
            warn!(
                "Dataset {}: {} features without a usable Point or Polygon geometry will never match",
                collection.alias, unusable
            );
        }

        Ok(collection)
    }

    #[inline]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&NormalizedRecord> {
        self.records.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<NormalizedRecord> {
        self.records.iter()
    }

    pub fn unusable_count(&self) -> usize {
        self.records.iter().filter(|record| !record.is_valid()).count()
    }
}

impl Index<usize> for FeatureCollection {
    type Output = NormalizedRecord;

    fn index(&self, index: usize) -> &NormalizedRecord {
        &self.records[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS_A_GEOJSON_STR: &str = include_str!("test_resources/points_a.geojson");
    const OVERPASS_GEOJSON_STR: &str = include_str!("test_resources/overpass_elements.json");
    const MALFORMED_GEOJSON_STR: &str = include_str!("test_resources/malformed_geojson.json");
    const ONE_FEATURE_GEOJSON_STR: &str = include_str!("test_resources/one_feature_geojson.json");

    #[test]
    fn it_should_load_features_in_order() {
        let collection = FeatureCollection::new_from_string("A", POINTS_A_GEOJSON_STR).unwrap();

        assert_eq!(collection.alias(), "A");
        assert_eq!(collection.len(), 4);
        assert_eq!(collection[0].attribute_text("id"), Some("a0".to_owned()));
        assert_eq!(collection[1].attribute_text("id"), Some("a1".to_owned()));
        assert_eq!(collection[3].attribute_text("id"), Some("a3".to_owned()));
    }

    #[test]
    fn it_should_keep_the_slot_of_invalid_features() {
        let collection = FeatureCollection::new_from_string("A", POINTS_A_GEOJSON_STR).unwrap();

        assert_eq!(collection[2], NormalizedRecord::Invalid);
        assert_eq!(collection.unusable_count(), 1);
        assert!(collection[3].is_valid());
    }

    #[test]
    fn it_should_read_overpass_elements_and_tags() {
        let collection = FeatureCollection::new_from_string("B", OVERPASS_GEOJSON_STR).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection[0].attribute_text("name"), Some("Usina Garcia".to_owned()));
        assert_eq!(collection[1].attribute_text("ref"), Some("UHE-2".to_owned()));
    }

    #[test]
    fn it_should_prefer_elements_over_features() {
        let collection = FeatureCollection::new_from_string(
            "A",
            r#"{"elements": [], "features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}}]}"#,
        )
        .unwrap();

        assert!(collection.is_empty());
    }

    #[test]
    fn it_should_fail_without_a_feature_container() {
        let result = FeatureCollection::new_from_string("A", ONE_FEATURE_GEOJSON_STR);

        match result.err() {
            Some(DatasetError::FeatureContainerNotFound) => {}
            _ => {
                panic!("Wrong Error");
            }
        }
    }

    #[test]
    fn it_should_fail_with_a_malformed_document() {
        let result = FeatureCollection::new_from_string("A", MALFORMED_GEOJSON_STR);

        match result.err() {
            Some(DatasetError::Json(_)) => {}
            _ => {
                panic!("Wrong Error");
            }
        }
    }

    #[test]
    fn it_should_fail_when_features_is_not_an_array() {
        let result = FeatureCollection::new_from_string("A", r#"{"features": {}}"#);

        match result.err() {
            Some(DatasetError::FeatureContainerNotAnArray("features")) => {}
            _ => {
                panic!("Wrong Error");
            }
        }
    }

    #[test]
    fn it_should_fail_when_document_is_not_an_object() {
        let result = FeatureCollection::new_from_string("A", "[]");

        match result.err() {
            Some(DatasetError::NotAnObject) => {}
            _ => {
                panic!("Wrong Error");
            }
        }
    }

    #[test]
    fn it_should_fail_with_a_missing_file() {
        let result = FeatureCollection::new("A", "does/not/exist.geojson");

        match result.err() {
            Some(DatasetError::Io(_)) => {}
            _ => {
                panic!("Wrong Error");
            }
        }
    }

    #[test]
    fn it_should_read_from_any_reader() {
        let collection =
            FeatureCollection::from_reader("A", POINTS_A_GEOJSON_STR.as_bytes()).unwrap();

        assert_eq!(collection.len(), 4);
    }
}
