use csv;
use serde;
use std::io;

use super::feature_collection::FeatureCollection;
use super::geo_diff_types::{label_a, label_b};
use super::matcher::MatchTable;
use super::normalized_record::NormalizedRecord;

const UNMATCHED_DISTANCE: &str = "-1";

pub const TABULAR_HEADER: [&str; 12] = [
    "uid_a",
    "uid_b",
    "id_a",
    "id_b",
    "distance_ab",
    "latitude_a",
    "longitude_a",
    "latitude_b",
    "longitude_b",
    "desc_a",
    "desc_b",
    "near_a",
];

/// One row of the flat summary. Field order matches `TABULAR_HEADER`.
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct TabularRow {
    pub uid_a: String,
    pub uid_b: String,
    pub id_a: String,
    pub id_b: String,
    pub distance_ab: String,
    pub latitude_a: String,
    pub longitude_a: String,
    pub latitude_b: String,
    pub longitude_b: String,
    pub desc_a: String,
    pub desc_b: String,
    pub near_a: String,
}

/// `name` (or `nome`), followed by `(ref)` when there is one.
pub fn short_title(record: &NormalizedRecord) -> String {
    let mut title = record
        .attribute_text("name")
        .or_else(|| record.attribute_text("nome"))
        .unwrap_or_default();

    if let Some(reference) = record.attribute_text("ref") {
        title.push_str(&format!(" ({})", reference));
    }

    title.trim().to_owned()
}

fn latitude_longitude(record: Option<&NormalizedRecord>) -> (String, String) {
    match record.and_then(NormalizedRecord::coordinate) {
        Some(coordinate) => (coordinate.y().to_string(), coordinate.x().to_string()),
        None => (String::new(), String::new()),
    }
}

pub fn tabular_rows(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
) -> Vec<TabularRow> {
    a.iter()
        .enumerate()
        .map(|(index_a, record_a)| {
            let found = table.get(index_a);
            let record_b = found.and_then(|found| b.get(found.b_index));

            let (latitude_a, longitude_a) = latitude_longitude(Some(record_a));
            let (latitude_b, longitude_b) = latitude_longitude(record_b);

            TabularRow {
                uid_a: label_a(index_a),
                uid_b: found.map(|found| label_b(found.b_index)).unwrap_or_default(),
                id_a: record_a.attribute_text("id").unwrap_or_default(),
                id_b: record_b
                    .and_then(|record| record.attribute_text("id"))
                    .unwrap_or_default(),
                distance_ab: found
                    .map(|found| found.distance.to_string())
                    .unwrap_or_else(|| UNMATCHED_DISTANCE.to_owned()),
                latitude_a,
                longitude_a,
                latitude_b,
                longitude_b,
                desc_a: short_title(record_a),
                desc_b: record_b.map(short_title).unwrap_or_default(),
                near_a: found
                    .and_then(|found| found.alternates.as_ref())
                    .map(|alternates| alternates.join(" "))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Writes the header and one row per record of A.
pub fn write_tabular(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
    output_file: &mut dyn io::Write,
    delimiter: u8,
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(output_file);

    csv_writer.write_record(&TABULAR_HEADER)?;

    let rows = tabular_rows(a, b, table);
    for row in &rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::super::matcher::Matcher;
    use super::*;
    use indicatif::ProgressBar;
    use serde_json::json;

    const POINTS_A_GEOJSON_STR: &str = include_str!("test_resources/points_a.geojson");
    const POINTS_B_GEOJSON_STR: &str = include_str!("test_resources/points_b.geojson");

    fn fixtures() -> (FeatureCollection, FeatureCollection, MatchTable) {
        let a = FeatureCollection::new_from_string("A", POINTS_A_GEOJSON_STR).unwrap();
        let b = FeatureCollection::new_from_string("B", POINTS_B_GEOJSON_STR).unwrap();
        let table = Matcher::new(100.0).compute(&a, &b, &ProgressBar::hidden());

        (a, b, table)
    }

    #[test]
    fn it_should_build_a_title_from_name_and_ref() {
        let record = NormalizedRecord::from_json(&json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "properties": {"nome": "Escola", "name": "School", "ref": 12}
        }));

        assert_eq!(short_title(&record), "School (12)");
    }

    #[test]
    fn it_should_trim_a_title_with_only_a_ref() {
        let record = NormalizedRecord::from_json(&json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "properties": {"ref": "R-7"}
        }));

        assert_eq!(short_title(&record), "(R-7)");
        assert_eq!(short_title(&NormalizedRecord::Invalid), "");
    }

    #[test]
    fn it_should_describe_every_a_record() {
        let (a, b, table) = fixtures();
        let rows = tabular_rows(&a, &b, &table);

        assert_eq!(rows.len(), 4);

        assert_eq!(
            rows[0],
            TabularRow {
                uid_a: "A0".to_owned(),
                uid_b: "B0".to_owned(),
                id_a: "a0".to_owned(),
                id_b: "b0".to_owned(),
                distance_ab: "0".to_owned(),
                latitude_a: "-27.5954".to_owned(),
                longitude_a: "-48.548".to_owned(),
                latitude_b: "-27.5954".to_owned(),
                longitude_b: "-48.548".to_owned(),
                desc_a: "Escola Central (E-1)".to_owned(),
                desc_b: "Escola Central".to_owned(),
                near_a: "".to_owned(),
            }
        );

        assert_eq!(rows[1].uid_b, "B1");
        assert_eq!(rows[1].desc_a, "Posto de Saúde");
        assert_eq!(rows[1].desc_b, "Posto (P-9)");
        assert_eq!(rows[1].near_a, "B1 B2");
        assert!(rows[1].distance_ab.starts_with("29."));

        assert_eq!(rows[2].uid_a, "A2");
        assert_eq!(rows[2].uid_b, "");
        assert_eq!(rows[2].distance_ab, "-1");
        assert_eq!(rows[2].latitude_a, "");

        assert_eq!(rows[3].id_a, "a3");
        assert_eq!(rows[3].distance_ab, "-1");
        assert_eq!(rows[3].latitude_b, "");
    }

    #[test]
    fn it_should_write_a_header_and_tab_separated_rows() {
        let (a, b, table) = fixtures();
        let mut output: Vec<u8> = Vec::new();

        let written = write_tabular(&a, &b, &table, &mut output, b'\t').unwrap();
        assert_eq!(written, 4);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "uid_a\tuid_b\tid_a\tid_b\tdistance_ab\tlatitude_a\tlongitude_a\tlatitude_b\tlongitude_b\tdesc_a\tdesc_b\tnear_a"
        );
        assert!(lines[3].starts_with("A2\t\t\t\t-1\t"));
    }

    #[test]
    fn it_should_write_the_header_for_an_empty_dataset() {
        let a = FeatureCollection::from_json("A", json!({"features": []})).unwrap();
        let b = FeatureCollection::from_json("B", json!({"features": []})).unwrap();
        let table = Matcher::new(100.0).compute(&a, &b, &ProgressBar::hidden());
        let mut output: Vec<u8> = Vec::new();

        assert_eq!(write_tabular(&a, &b, &table, &mut output, b',').unwrap(), 0);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.trim_end(), TABULAR_HEADER.join(","));
    }

    #[test]
    fn it_should_quote_fields_containing_the_delimiter() {
        let a = FeatureCollection::from_json(
            "A",
            json!({"features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {"name": "Rua A, 10"}}]}),
        )
        .unwrap();
        let b = FeatureCollection::from_json("B", json!({"features": []})).unwrap();
        let table = Matcher::new(100.0).compute(&a, &b, &ProgressBar::hidden());
        let mut output: Vec<u8> = Vec::new();

        write_tabular(&a, &b, &table, &mut output, b',').unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().nth(1), Some("A0,,,,-1,0,0,,,\"Rua A, 10\",,"));
    }
}
