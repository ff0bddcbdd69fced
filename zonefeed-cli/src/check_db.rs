//! Check-db command: sample the testing locations table over Postgres.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::{
    ARG_DB_HOST, ARG_DB_PASSWORD, ARG_DB_USER, CliError, ENV_DB_HOST, ENV_DB_PASSWORD,
    ENV_DB_USER, write_json,
};

pub(crate) const DEFAULT_DB_PORT: u16 = 5432;
pub(crate) const DEFAULT_DB_NAME: &str = "postgres";
pub(crate) const DEFAULT_SAMPLE_LIMIT: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

const SAMPLE_QUERY: &str = "SELECT zip_code::text, screened_count::text, \
                            positive_count::text, priority::text \
                            FROM testing_locations LIMIT $1";

/// CLI arguments for the `check-db` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    about = "Check Postgres connectivity",
    long_about = "Connect to Postgres, read a few rows from the \
                  testing_locations table and print them. Connection \
                  parameters fall back to the user, password, host, port \
                  and dbname environment variables."
)]
#[ortho_config(prefix = "ZONEFEED")]
pub(crate) struct CheckDbArgs {
    /// Database user.
    #[arg(long = ARG_DB_USER, env = ENV_DB_USER, value_name = "name")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Database password.
    #[arg(long = ARG_DB_PASSWORD, env = ENV_DB_PASSWORD, value_name = "secret", hide_env_values = true)]
    #[serde(default)]
    pub(crate) password: Option<String>,
    /// Database host.
    #[arg(long = ARG_DB_HOST, env = ENV_DB_HOST, value_name = "host")]
    #[serde(default)]
    pub(crate) host: Option<String>,
    /// Database port.
    #[arg(long, env = "port", value_name = "port")]
    #[serde(default)]
    pub(crate) port: Option<u16>,
    /// Database name.
    #[arg(long, env = "dbname", value_name = "name")]
    #[serde(default)]
    pub(crate) dbname: Option<String>,
    /// Rows to sample.
    #[arg(long, value_name = "rows")]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
}

impl CheckDbArgs {
    fn into_config(self) -> Result<DbCheckConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DbCheckConfig::try_from(merged)
    }
}

/// Resolved Postgres connection settings. The password is redacted from
/// `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct DbCheckConfig {
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) dbname: String,
    pub(crate) limit: u32,
}

impl fmt::Debug for DbCheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCheckConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("limit", &self.limit)
            .finish()
    }
}

impl TryFrom<CheckDbArgs> for DbCheckConfig {
    type Error = CliError;

    fn try_from(args: CheckDbArgs) -> Result<Self, Self::Error> {
        let user = args.user.ok_or(CliError::MissingArgument {
            field: ARG_DB_USER,
            env: ENV_DB_USER,
        })?;
        let password = args.password.ok_or(CliError::MissingArgument {
            field: ARG_DB_PASSWORD,
            env: ENV_DB_PASSWORD,
        })?;
        let host = args.host.ok_or(CliError::MissingArgument {
            field: ARG_DB_HOST,
            env: ENV_DB_HOST,
        })?;
        Ok(Self {
            user,
            password,
            host,
            port: args.port.unwrap_or(DEFAULT_DB_PORT),
            dbname: args
                .dbname
                .unwrap_or_else(|| DEFAULT_DB_NAME.to_owned()),
            limit: args.limit.unwrap_or(DEFAULT_SAMPLE_LIMIT),
        })
    }
}

impl DbCheckConfig {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
    }
}

/// One sampled row; every column is read as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TestingLocation {
    pub(crate) zip_code: Option<String>,
    pub(crate) screened_count: Option<String>,
    pub(crate) positive_count: Option<String>,
    pub(crate) priority: Option<String>,
}

type LocationRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl From<LocationRow> for TestingLocation {
    fn from((zip_code, screened_count, positive_count, priority): LocationRow) -> Self {
        Self {
            zip_code,
            screened_count,
            positive_count,
            priority,
        }
    }
}

async fn sample_locations(config: &DbCheckConfig) -> Result<Vec<TestingLocation>, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(config.connect_options())
        .await?;
    info!(
        "connected to postgres at {}:{}/{}",
        config.host, config.port, config.dbname
    );
    let rows = sqlx::query_as::<_, LocationRow>(SAMPLE_QUERY)
        .bind(i64::from(config.limit))
        .fetch_all(&pool)
        .await;
    pool.close().await;
    Ok(rows?.into_iter().map(TestingLocation::from).collect())
}

pub(crate) fn run_check_db(args: CheckDbArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let locations = runtime.block_on(sample_locations(&config))?;
    for location in &locations {
        info!("testing location: {location:?}");
    }
    info!("sampled {} rows from testing_locations", locations.len());
    write_json(writer, &locations)
}
