use super::diff_config::{OutputTarget, OutputTargets};
use super::geo_diff::{self, FeatureCollection, MatchTable};

use csv;
use failure::Fail;
use std::fs::File;
use std::io;
use std::io::Write;

use log::info;

#[derive(Debug, Fail)]
pub enum OutputError {
    #[fail(display = "I/O error: {}", _0)]
    Io(io::Error),
    #[fail(display = "Csv error: {}", _0)]
    Csv(csv::Error),
    #[fail(display = "JSON error: {}", _0)]
    Json(serde_json::Error),
}

impl From<io::Error> for OutputError {
    fn from(err: io::Error) -> OutputError {
        OutputError::Io(err)
    }
}

impl From<csv::Error> for OutputError {
    fn from(err: csv::Error) -> OutputError {
        OutputError::Csv(err)
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> OutputError {
        OutputError::Json(err)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    GeoJson,
    Csv,
    Tsv,
}

/// Selected outputs in writing order. Without any, the TSV summary goes to stdout.
pub fn planned_outputs(targets: &OutputTargets) -> Vec<(OutputFormat, OutputTarget)> {
    if targets.is_empty() {
        return vec![(OutputFormat::Tsv, OutputTarget::Stdout)];
    }

    let mut planned = Vec::new();
    if let Some(target) = &targets.csv {
        planned.push((OutputFormat::Csv, target.clone()));
    }
    if let Some(target) = &targets.tsv {
        planned.push((OutputFormat::Tsv, target.clone()));
    }
    if let Some(target) = &targets.geojson {
        planned.push((OutputFormat::GeoJson, target.clone()));
    }

    planned
}

pub fn write_diff_geojson(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
    output_file: &mut dyn io::Write,
) -> Result<(), OutputError> {
    let text = geo_diff::diff_geojson_string(a, b, table)?;

    output_file.write_all(text.as_bytes())?;
    output_file.write_all(b"\n")?;
    output_file.flush()?;

    Ok(())
}

pub fn write_output(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
    format: OutputFormat,
    output_file: &mut dyn io::Write,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::GeoJson => write_diff_geojson(a, b, table, output_file),
        OutputFormat::Csv => geo_diff::write_tabular(a, b, table, output_file, b',')
            .map(|_| ())
            .map_err(OutputError::from),
        OutputFormat::Tsv => geo_diff::write_tabular(a, b, table, output_file, b'\t')
            .map(|_| ())
            .map_err(OutputError::from),
    }
}

pub fn write_outputs(
    a: &FeatureCollection,
    b: &FeatureCollection,
    table: &MatchTable,
    targets: &OutputTargets,
) -> Result<(), OutputError> {
    for (format, target) in planned_outputs(targets) {
        match target {
            OutputTarget::Path(path) => {
                info!("Writing {:?} diff to file {}.", format, path.display());
                let mut output_file = io::BufWriter::new(File::create(&path)?);
                write_output(a, b, table, format, &mut output_file)?;
            }
            OutputTarget::Stdout => {
                info!("Writing {:?} diff to stdout.", format);
                let stdout = io::stdout();
                let mut output_file = stdout.lock();
                write_output(a, b, table, format, &mut output_file)?;
            }
        }
    }

    Ok(())
}
