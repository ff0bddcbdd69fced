//! Remote store settings shared by the `ingest` and `insert` commands.

use std::fmt;
use std::time::Duration;

use zonefeed_core::RemoteStore;
use zonefeed_data::store::{DEFAULT_TIMEOUT_SECS, HttpRemoteStore, RemoteStoreConfig};

use crate::{ARG_API_KEY, ARG_SUPABASE_URL, CliError, ENV_API_KEY, ENV_SUPABASE_URL};

/// Resolved store connection settings. The key is redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct StoreSettings {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) bearer_token: Option<String>,
    pub(crate) timeout: Duration,
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StoreSettings {
    /// Validate the merged option values, failing before any network call.
    pub(crate) fn resolve(
        url: Option<String>,
        key: Option<String>,
        token: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CliError> {
        let base_url = non_blank(url).ok_or(CliError::MissingArgument {
            field: ARG_SUPABASE_URL,
            env: ENV_SUPABASE_URL,
        })?;
        let api_key = non_blank(key).ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_API_KEY,
        })?;
        Ok(Self {
            base_url,
            api_key,
            bearer_token: non_blank(token),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    pub(crate) fn to_remote_config(&self) -> RemoteStoreConfig {
        let config = RemoteStoreConfig::new(self.base_url.clone(), self.api_key.clone())
            .with_timeout(self.timeout);
        match &self.bearer_token {
            Some(token) => config.with_bearer_token(token.clone()),
            None => config,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Builds the remote store used by a command invocation.
pub(crate) trait StoreBuilder {
    fn build(&self, settings: &StoreSettings) -> Result<Box<dyn RemoteStore + '_>, CliError>;
}

pub(crate) struct HttpStoreBuilder;

impl StoreBuilder for HttpStoreBuilder {
    fn build(&self, settings: &StoreSettings) -> Result<Box<dyn RemoteStore + '_>, CliError> {
        let store = HttpRemoteStore::with_config(settings.to_remote_config()).map_err(|source| {
            CliError::BuildStore {
                base_url: settings.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(store))
    }
}
