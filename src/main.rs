extern crate failure;
use failure::Error;

use log::{error, info, warn};
use simplelog;
use std::fs::File;
use std::io;
use std::path::Path;

use geojson_diff::cli_utils;
use geojson_diff::diff_config::{self, ConfigError, DatasetSource, DiffConfig};
use geojson_diff::geo_diff::{FeatureCollection, Matcher};
use geojson_diff::output_writer;

use chrono::offset::Local;

fn log_config() -> simplelog::Config {
    let local_time = Local::now();
    let time_offset = local_time.offset();

    simplelog::Config {
        offset: time_offset.clone(),
        ..simplelog::Config::default()
    }
}

fn init_term_logging() {
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        log_config(),
        simplelog::TerminalMode::Stderr,
    )
    .ok();
}

fn init_logging(log_path: Option<&Path>) {
    let log_path = match log_path {
        Some(path) => path,
        None => return init_term_logging(),
    };

    match File::create(log_path) {
        Ok(file) => {
            simplelog::WriteLogger::init(simplelog::LevelFilter::Info, log_config(), file).ok();
        }
        Err(err) => {
            init_term_logging();
            warn!(
                "Unable to open log file {}: {}. Logging to stderr.",
                log_path.display(),
                err
            );
        }
    }
}

fn main() {
    let matches = diff_config::cli_app().get_matches();
    let config = DiffConfig::from_matches(&matches);

    init_logging(config.as_ref().ok().and_then(|config| config.log_path.as_deref()));

    match do_main(config) {
        Ok(_) => info!("Process finished OK"),
        Err(err) => {
            error!("Process finished with an error: {}", err);
            std::process::exit(1);
        }
    };
}

fn load_dataset(alias: &str, source: &DatasetSource) -> Result<FeatureCollection, Error> {
    let collection = match source {
        DatasetSource::Path(path) => {
            info!("Loading dataset {} from {} ...", alias, path.display());
            FeatureCollection::new(alias, path)?
        }
        DatasetSource::Stdin => {
            info!("Loading dataset {} from stdin ...", alias);
            let stdin = io::stdin();
            let input = stdin.lock();
            FeatureCollection::from_reader(alias, input)?
        }
    };

    Ok(collection)
}

fn diff_command(config: &DiffConfig) -> Result<(), Error> {
    let a = load_dataset("A", &config.dataset_a)?;
    let b = load_dataset("B", &config.dataset_b)?;

    info!(
        "Matching {} features of A against {} features of B (tolerance: {} m)",
        a.len(),
        b.len(),
        config.tolerance
    );

    let progress_bar =
        cli_utils::create_progress_bar_count(config.quiet, "Matching...", Some(a.len() as u64));
    let table = Matcher::new(config.tolerance).compute(&a, &b, &progress_bar);

    let summary = table.summary();
    info!(
        "A {} | {} matched ({} exact, {} near), {} unmatched, {} unusable",
        summary.total_a,
        summary.exact + summary.near,
        summary.exact,
        summary.near,
        summary.unmatched,
        summary.unusable_a
    );
    info!("B {} | {} unusable", summary.total_b, summary.unusable_b);

    output_writer::write_outputs(&a, &b, &table, &config.outputs)?;

    Ok(())
}

fn do_main(config: Result<DiffConfig, ConfigError>) -> Result<(), Error> {
    let config = config?;

    diff_command(&config)
}
