//! Ingest command implementation for the zonefeed CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use zonefeed_core::SkipPolicy;
use zonefeed_data::{DEFAULT_ZONE_TABLE, IngestOptions, IngestReport, ingest_zones};

use crate::store::{HttpStoreBuilder, StoreBuilder, StoreSettings};
use crate::{ARG_API_KEY, ARG_SUPABASE_URL, CliError, ENV_API_KEY, ENV_SUPABASE_URL, absolute, write_json};

/// GeoJSON produced by the shapefile conversion, relative to the backend.
pub(crate) const DEFAULT_INGEST_INPUT: &str = "../frontend/public/data/residential_zones.geojson";

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read a GeoJSON feature collection, normalise every feature \
                 into a zone record and submit the records to the remote \
                 store as a single batch. Credentials come from CLI flags, \
                 configuration files or environment variables.",
    about = "Load GeoJSON zones into the remote store"
)]
#[ortho_config(prefix = "ZONEFEED")]
pub(crate) struct IngestArgs {
    /// Path to the GeoJSON zone file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Remote table receiving the zones.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) table: Option<String>,
    /// Project URL of the remote store.
    #[arg(long = ARG_SUPABASE_URL, env = ENV_SUPABASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) supabase_url: Option<String>,
    /// Project API key.
    #[arg(long = ARG_API_KEY, env = ENV_API_KEY, value_name = "key", hide_env_values = true)]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Bearer token when it differs from the API key.
    #[arg(long, value_name = "token")]
    #[serde(default)]
    pub(crate) bearer_token: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// What to do with invalid features: `skip` or `fail`.
    #[arg(long, value_name = "policy")]
    #[serde(default)]
    pub(crate) on_invalid: Option<SkipPolicy>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    /// Absolute path to the GeoJSON input.
    pub(crate) input: Utf8PathBuf,
    /// Remote store connection.
    pub(crate) store: StoreSettings,
    /// Target table and skip policy.
    pub(crate) options: IngestOptions,
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let store = StoreSettings::resolve(
            args.supabase_url,
            args.api_key,
            args.bearer_token,
            args.timeout_secs,
        )?;
        let relative = args
            .input
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_INGEST_INPUT));
        let options = IngestOptions::new(args.table.unwrap_or_else(|| DEFAULT_ZONE_TABLE.to_owned()))
            .with_skip_policy(args.on_invalid.unwrap_or_default());
        Ok(Self {
            input: absolute(&relative)?,
            store,
            options,
        })
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}

/// Console summary of an ingestion run.
#[derive(Debug, Serialize)]
struct IngestSummary<'a> {
    input: &'a Utf8Path,
    table: &'a str,
    features: usize,
    inserted: usize,
    skipped: usize,
    status: Option<u16>,
}

impl<'a> IngestSummary<'a> {
    fn new(config: &'a IngestConfig, report: &IngestReport) -> Self {
        Self {
            input: &config.input,
            table: &config.options.table,
            features: report.features,
            inserted: report.inserted,
            skipped: report.skipped_count(),
            status: report.response.as_ref().map(|response| response.status),
        }
    }
}

pub(crate) fn run_ingest(args: IngestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_ingest_with(&config, &HttpStoreBuilder, writer)
}

pub(crate) fn run_ingest_with(
    config: &IngestConfig,
    builder: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    info!("ingesting zones from {}", config.input);
    let store = builder.build(&config.store)?;
    let report = ingest_zones(&config.input, &*store, &config.options)?;
    info!(
        "ingested {} of {} features into {} ({} skipped)",
        report.inserted,
        report.features,
        config.options.table,
        report.skipped_count()
    );
    write_json(writer, &IngestSummary::new(config, &report))
}
