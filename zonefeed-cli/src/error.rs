//! Error types emitted by the zonefeed CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use zonefeed_core::StoreError;
use zonefeed_data::{ConvertError, StoreBuildError, ZoneIngestError};

/// Errors emitted by the zonefeed CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long option name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A relative path could not be resolved against the working directory.
    #[error("failed to resolve {path} to an absolute path: {source}")]
    ResolvePath {
        /// Path as given.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Constructing the HTTP store client failed.
    #[error("failed to build remote store client for {base_url}: {source}")]
    BuildStore {
        /// Configured store URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: StoreBuildError,
    },
    /// Zone ingestion failed.
    #[error("zone ingestion failed: {0}")]
    Ingest(#[from] ZoneIngestError),
    /// Opening the insert payload failed.
    #[error("failed to open insert payload at {path}: {source}")]
    OpenPayload {
        /// Payload path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The insert payload is not valid JSON.
    #[error("failed to parse insert payload at {path}: {source}")]
    ParsePayload {
        /// Payload path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The insert payload is valid JSON but not an object.
    #[error("insert payload at {path} must be a JSON object")]
    PayloadNotObject {
        /// Payload path.
        path: Utf8PathBuf,
    },
    /// The remote store refused or failed a single-row insert.
    #[error("insert failed: {0}")]
    Insert(#[from] StoreError),
    /// Shapefile conversion failed.
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),
    /// Building the async runtime for the database check failed.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The database connectivity check failed.
    #[error("database check failed: {0}")]
    Database(#[from] sqlx::Error),
    /// Serialising command output failed.
    #[error("failed to serialise command output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
