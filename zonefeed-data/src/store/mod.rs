//! REST adapters for the [`zonefeed_core::RemoteStore`] seam.
//!
//! [`HttpRemoteStore`] speaks the PostgREST dialect exposed by Supabase:
//! rows are POSTed as JSON to `{base_url}/rest/v1/{table}` with the project
//! API key in both the `apikey` and `Authorization` headers, and the store is
//! asked to echo the inserted representation.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use serde_json::json;
//! use zonefeed_core::RemoteStore;
//! use zonefeed_data::store::{HttpRemoteStore, RemoteStoreConfig};
//!
//! let config = RemoteStoreConfig::new("https://project.supabase.co", "service-key")
//!     .with_timeout(Duration::from_secs(10));
//! let store = HttpRemoteStore::with_config(config)?;
//! let response = store.insert_single("fake_recommendations", &json!({ "zipcode": 1430 }))?;
//! println!("status {}", response.status);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod http;

pub use http::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpRemoteStore, RemoteStoreConfig, StoreBuildError,
};
