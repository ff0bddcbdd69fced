//! Command-line interface for the zonefeed backend tooling.
//!
//! Each subcommand mirrors one of the operational scripts: `ingest` loads
//! GeoJSON zones into the remote store, `insert` submits a single row,
//! `convert` turns a shapefile into GeoJSON and `check-db` runs a
//! connectivity query against Postgres.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod check_db;
mod convert;
mod error;
mod ingest;
mod insert;
mod store;

pub use error::CliError;

pub(crate) const ARG_SUPABASE_URL: &str = "supabase-url";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_INSERT_PAYLOAD: &str = "payload";
pub(crate) const ARG_DB_USER: &str = "user";
pub(crate) const ARG_DB_PASSWORD: &str = "password";
pub(crate) const ARG_DB_HOST: &str = "host";
pub(crate) const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub(crate) const ENV_API_KEY: &str = "SUPABASE_API_KEY";
pub(crate) const ENV_INSERT_PAYLOAD: &str = "ZONEFEED_CMDS_INSERT_PAYLOAD";
pub(crate) const ENV_DB_USER: &str = "user";
pub(crate) const ENV_DB_PASSWORD: &str = "password";
pub(crate) const ENV_DB_HOST: &str = "host";

/// Run the zonefeed CLI with the current process arguments and environment.
///
/// Help and version requests print and exit the process directly.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration or the selected
/// command fails.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Ingest(args) => ingest::run_ingest(args, &mut stdout),
        Command::Insert(args) => insert::run_insert(args, &mut stdout),
        Command::Convert(args) => convert::run_convert(args, &mut stdout),
        Command::CheckDb(args) => check_db::run_check_db(args, &mut stdout),
    }
}

/// Resolve `path` against the working directory without requiring it to exist.
pub(crate) fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf, CliError> {
    let resolve_error = |source| CliError::ResolvePath {
        path: path.to_path_buf(),
        source,
    };
    let resolved = std::path::absolute(path).map_err(resolve_error)?;
    Utf8PathBuf::from_path_buf(resolved)
        .map_err(|_| resolve_error(std::io::Error::other("working directory is not UTF-8")))
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "zonefeed",
    about = "Residential zone ingestion and conversion utilities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load GeoJSON zones into the remote store as one batch.
    Ingest(ingest::IngestArgs),
    /// Insert a single JSON row into a remote table.
    Insert(insert::InsertArgs),
    /// Convert a shapefile into GeoJSON for the map frontend.
    Convert(convert::ConvertArgs),
    /// Check Postgres connectivity by sampling the testing locations table.
    CheckDb(check_db::CheckDbArgs),
}

#[cfg(test)]
mod tests;
