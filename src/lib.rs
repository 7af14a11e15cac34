#[macro_use]
extern crate clap;

pub mod cli_utils;
pub mod diff_config;
pub mod geo_diff;
pub mod output_writer;
