//! Insert command: submit one JSON object to a remote table.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zonefeed_fs::open_utf8_file;

use crate::store::{HttpStoreBuilder, StoreBuilder, StoreSettings};
use crate::{
    ARG_API_KEY, ARG_INSERT_PAYLOAD, ARG_SUPABASE_URL, CliError, ENV_API_KEY, ENV_INSERT_PAYLOAD,
    ENV_SUPABASE_URL, write_json,
};

/// Table written by `insert` unless overridden.
pub(crate) const DEFAULT_INSERT_TABLE: &str = "fake_recommendations";

/// CLI arguments for the `insert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Insert one JSON object into a remote table. Only a \
                  `201 Created` response counts as success; the echoed row \
                  is printed.",
    about = "Insert a single JSON row"
)]
#[ortho_config(prefix = "ZONEFEED")]
pub(crate) struct InsertArgs {
    /// Path to a JSON file holding one object.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) payload: Option<Utf8PathBuf>,
    /// Remote table receiving the row.
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
}

impl InsertArgs {
    fn into_config(self) -> Result<InsertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InsertConfig::try_from(merged)
    }
}

/// Resolved `insert` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertConfig {
    pub(crate) payload: Utf8PathBuf,
    pub(crate) table: String,
    pub(crate) store: StoreSettings,
}

impl TryFrom<InsertArgs> for InsertConfig {
    type Error = CliError;

    fn try_from(args: InsertArgs) -> Result<Self, Self::Error> {
        let payload = args.payload.ok_or(CliError::MissingArgument {
            field: ARG_INSERT_PAYLOAD,
            env: ENV_INSERT_PAYLOAD,
        })?;
        let store = StoreSettings::resolve(
            args.supabase_url,
            args.api_key,
            args.bearer_token,
            args.timeout_secs,
        )?;
        Ok(Self {
            payload,
            table: args
                .table
                .unwrap_or_else(|| DEFAULT_INSERT_TABLE.to_owned()),
            store,
        })
    }
}

/// Load the payload, rejecting anything but a JSON object.
pub(crate) fn load_payload(path: &Utf8Path) -> Result<Value, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPayload {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParsePayload {
            path: path.to_path_buf(),
            source,
        })?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::PayloadNotObject {
            path: path.to_path_buf(),
        })
    }
}

pub(crate) fn run_insert(args: InsertArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_insert_with(&config, &HttpStoreBuilder, writer)
}

pub(crate) fn run_insert_with(
    config: &InsertConfig,
    builder: &dyn StoreBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let row = load_payload(&config.payload)?;
    let store = builder.build(&config.store)?;
    let response = store.insert_single(&config.table, &row)?;
    info!(
        "inserted row into {} with status {}",
        config.table, response.status
    );
    write_json(writer, &response.body)
}
