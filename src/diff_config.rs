use clap::{App, Arg, ArgMatches};
use failure::Fail;

use std::path::PathBuf;

use super::geo_diff::DEFAULT_TOLERANCE_METERS;

/// Path argument meaning stdin for inputs and stdout for outputs.
pub const STDIO_PATH: &str = "-";

#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(
        display = "Invalid tolerance {:?}: expected a non-negative distance in meters",
        _0
    )]
    InvalidTolerance(String),
    #[fail(display = "Only one dataset can be read from stdin")]
    BothDatasetsFromStdin,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DatasetSource {
    Path(PathBuf),
    Stdin,
}

impl DatasetSource {
    fn from_arg(value: &str) -> DatasetSource {
        match value {
            STDIO_PATH => DatasetSource::Stdin,
            path => DatasetSource::Path(PathBuf::from(path)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OutputTarget {
    Path(PathBuf),
    Stdout,
}

impl OutputTarget {
    fn from_arg(value: &str) -> OutputTarget {
        match value {
            STDIO_PATH => OutputTarget::Stdout,
            path => OutputTarget::Path(PathBuf::from(path)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutputTargets {
    pub geojson: Option<OutputTarget>,
    pub csv: Option<OutputTarget>,
    pub tsv: Option<OutputTarget>,
}

impl OutputTargets {
    pub fn is_empty(&self) -> bool {
        self.geojson.is_none() && self.csv.is_none() && self.tsv.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiffConfig {
    pub dataset_a: DatasetSource,
    pub dataset_b: DatasetSource,
    /// Meters.
    pub tolerance: f64,
    pub outputs: OutputTargets,
    pub log_path: Option<PathBuf>,
    pub quiet: bool,
}

pub fn parse_tolerance(value: &str) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(tolerance) if tolerance.is_finite() && tolerance >= 0.0 => Ok(tolerance),
        _ => Err(ConfigError::InvalidTolerance(value.to_owned())),
    }
}

impl DiffConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<DiffConfig, ConfigError> {
        let dataset_a = DatasetSource::from_arg(matches.value_of("geodataset_a").unwrap_or_default());
        let dataset_b = DatasetSource::from_arg(matches.value_of("geodataset_b").unwrap_or_default());

        if dataset_a == DatasetSource::Stdin && dataset_b == DatasetSource::Stdin {
            return Err(ConfigError::BothDatasetsFromStdin);
        }

        let tolerance = match matches.value_of("tolerate-distance") {
            Some(value) => parse_tolerance(value)?,
            None => DEFAULT_TOLERANCE_METERS,
        };

        let outputs = OutputTargets {
            geojson: matches.value_of("output-diff-geojson").map(OutputTarget::from_arg),
            csv: matches.value_of("output-diff-csv").map(OutputTarget::from_arg),
            tsv: matches.value_of("output-diff-tsv").map(OutputTarget::from_arg),
        };

        Ok(DiffConfig {
            dataset_a,
            dataset_b,
            tolerance,
            outputs,
            log_path: matches.value_of("output-log").map(PathBuf::from),
            quiet: matches.is_present("quiet"),
        })
    }
}

pub fn cli_app() -> App<'static, 'static> {
    App::new("geojson-diff")
        .version(crate_version!())
        .about("Match the features of GeoJSON dataset A against dataset B")
        .arg(Arg::with_name("geodataset_a")
            .help("GeoJSON dataset 'A'. Use - for stdin.")
            .required(true)
            .index(1)
        )
        .arg(Arg::with_name("geodataset_b")
            .help("GeoJSON dataset 'B'. Use - for stdin.")
            .required(true)
            .index(2)
        )
        .arg(Arg::with_name("output-diff-geojson")
            .long("output-diff-geojson")
            .help("Path to output GeoJSON diff file. Use - for stdout.")
            .takes_value(true)
        )
        .arg(Arg::with_name("output-diff-csv")
            .long("output-diff-csv")
            .help("Path to output CSV diff file. Use - for stdout.")
            .takes_value(true)
        )
        .arg(Arg::with_name("output-diff-tsv")
            .long("output-diff-tsv")
            .help("Path to output TSV (tab-separated values) diff file. Use - for stdout.")
            .takes_value(true)
        )
        .arg(Arg::with_name("output-log")
            .long("output-log")
            .help("Write the log into this file instead of stderr.")
            .takes_value(true)
        )
        .arg(Arg::with_name("tolerate-distance")
            .long("tolerate-distance")
            .help("Maximum distance in meters for features to match if not the exact same point.")
            .takes_value(true)
            .default_value("100")
        )
        .arg(Arg::with_name("quiet")
            .short("q")
            .long("quiet")
            .help("Hide the progress bar.")
        )
}
