//! Blocking PostgREST client built on `reqwest`.
//!
//! The [`RemoteStore`] trait is synchronous so ingestion stays a plain
//! function call. This client bridges to async HTTP by blocking on a Tokio
//! runtime it owns.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use zonefeed_core::{InsertKind, RemoteStore, StoreError, StoreResponse};

/// Default user agent for store requests.
pub const DEFAULT_USER_AGENT: &str = "zonefeed/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing an [`HttpRemoteStore`].
#[derive(Debug, Error)]
pub enum StoreBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The Tokio runtime could not be built.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Connection settings for [`HttpRemoteStore`].
///
/// The API key is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteStoreConfig {
    /// Project URL, e.g. `https://project.supabase.co`.
    pub base_url: String,
    /// Project API key sent in the `apikey` header.
    pub api_key: String,
    /// Bearer token for `Authorization`; the API key when `None`.
    pub bearer_token: Option<String>,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for RemoteStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RemoteStoreConfig {
    /// Settings for `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            bearer_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Send a bearer token that differs from the API key.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Token placed in the `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer(&self) -> &str {
        self.bearer_token.as_deref().unwrap_or(&self.api_key)
    }
}

/// [`RemoteStore`] backed by a PostgREST endpoint.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the store blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it blocks on the caller's handle
/// through [`tokio::task::block_in_place`]. Inside a `current_thread`
/// runtime it falls back to its own runtime, which stalls the caller's
/// runtime for the duration of the request.
pub struct HttpRemoteStore {
    client: Client,
    config: RemoteStoreConfig,
    runtime: Runtime,
}

impl fmt::Debug for HttpRemoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRemoteStore")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpRemoteStore {
    /// Create a store with default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, StoreBuildError> {
        Self::with_config(RemoteStoreConfig::new(base_url, api_key))
    }

    /// Create a store with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: RemoteStoreConfig) -> Result<Self, StoreBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(StoreBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StoreBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Settings this store was built with.
    #[must_use]
    pub const fn config(&self) -> &RemoteStoreConfig {
        &self.config
    }

    /// REST URL for `table`: `{base_url}/rest/v1/{table}`.
    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    async fn post(
        &self,
        kind: InsertKind,
        table: &str,
        payload: &Value,
    ) -> Result<StoreResponse, StoreError> {
        let url = self.table_url(table);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer())
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await
            .map_err(|err| self.transport_error(&err, &url))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| self.transport_error(&err, &url))?;

        if !kind.accepts(status) {
            warn!("insert into {table} rejected with status {status}: {text}");
            return Err(StoreError::Rejected {
                table: table.to_owned(),
                status,
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|err| StoreError::Decode {
                url: url.clone(),
                message: err.to_string(),
            })?
        };
        info!("insert into {table} accepted with status {status}");
        Ok(StoreResponse { status, body })
    }

    fn transport_error(&self, error: &reqwest::Error, url: &str) -> StoreError {
        if error.is_timeout() {
            return StoreError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        StoreError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn submit(
        &self,
        kind: InsertKind,
        table: &str,
        payload: &Value,
    ) -> Result<StoreResponse, StoreError> {
        if table.trim().is_empty() {
            return Err(StoreError::InvalidTable);
        }
        self.block_on(self.post(kind, table, payload))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        // block_in_place needs a multi-threaded runtime; anything else uses
        // the owned runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl RemoteStore for HttpRemoteStore {
    fn insert_single(&self, table: &str, row: &Value) -> Result<StoreResponse, StoreError> {
        self.submit(InsertKind::Single, table, row)
    }

    fn insert_batch(&self, table: &str, rows: &[Value]) -> Result<StoreResponse, StoreError> {
        self.submit(InsertKind::Batch, table, &Value::Array(rows.to_vec()))
    }
}
