//! Convert command: shapefile to GeoJSON.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};
use zonefeed_data::{ConvertSummary, convert_shapefile};

use crate::{CliError, absolute, write_json};

pub(crate) const DEFAULT_CONVERT_INPUT: &str = "data/Combined_residential_zones1.shp";
pub(crate) const DEFAULT_CONVERT_OUTPUT: &str = "../frontend/public/data/residential_zones.geojson";

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, Default)]
#[command(
    about = "Convert a shapefile into a GeoJSON feature collection",
    long_about = "Read every shape and attribute record from a shapefile and \
                  write them as a GeoJSON feature collection. Parent \
                  directories of the output are created as needed."
)]
pub(crate) struct ConvertArgs {
    /// Shapefile to read; the sibling `.dbf` supplies attributes.
    #[arg(long, value_name = "path")]
    pub(crate) input: Option<Utf8PathBuf>,
    /// GeoJSON file to write.
    #[arg(long, value_name = "path")]
    pub(crate) output: Option<Utf8PathBuf>,
}

/// Resolved `convert` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let input = args
            .input
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CONVERT_INPUT));
        let output = args
            .output
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CONVERT_OUTPUT));
        Ok(Self {
            input: absolute(&input)?,
            output: absolute(&output)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct BoundsOutput {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

#[derive(Debug, Serialize)]
struct ConvertOutput<'a> {
    output: &'a Utf8PathBuf,
    features: usize,
    fields: &'a [String],
    bounds: Option<BoundsOutput>,
}

impl<'a> ConvertOutput<'a> {
    fn new(config: &'a ConvertConfig, summary: &'a ConvertSummary) -> Self {
        Self {
            output: &config.output,
            features: summary.features,
            fields: &summary.fields,
            bounds: summary.bounds.map(|rect| BoundsOutput {
                min_x: rect.min().x,
                min_y: rect.min().y,
                max_x: rect.max().x,
                max_y: rect.max().y,
            }),
        }
    }
}

pub(crate) fn run_convert(args: ConvertArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = ConvertConfig::try_from(args)?;
    run_convert_with(&config, writer)
}

pub(crate) fn run_convert_with(
    config: &ConvertConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    info!("converting {} to {}", config.input, config.output);
    let summary = convert_shapefile(&config.input, &config.output)?;
    info!(
        "wrote {} features with columns [{}]",
        summary.features,
        summary.fields.join(", ")
    );
    write_json(writer, &ConvertOutput::new(config, &summary))
}
