//! Test helpers: a store builder over an in-memory store and temp files.

use super::*;
use crate::store::{StoreBuilder, StoreSettings};
use camino::Utf8PathBuf;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use zonefeed_core::RemoteStore;
use zonefeed_core::test_support::RecordingStore;

/// Hands out a borrowed [`RecordingStore`] instead of an HTTP client.
pub(super) struct RecordingBuilder {
    pub(super) store: RecordingStore,
}

impl RecordingBuilder {
    pub(super) const fn new(store: RecordingStore) -> Self {
        Self { store }
    }
}

impl StoreBuilder for RecordingBuilder {
    fn build(&self, _settings: &StoreSettings) -> Result<Box<dyn RemoteStore + '_>, CliError> {
        Ok(Box::new(&self.store))
    }
}

pub(super) fn settings() -> StoreSettings {
    StoreSettings {
        base_url: "http://store.invalid".to_owned(),
        api_key: "anon-key".to_owned(),
        bearer_token: None,
        timeout: Duration::from_secs(5),
    }
}

/// Temporary directory for files written by a test.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp path is UTF-8");
        Self { _dir: dir, root }
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn output_json(buffer: &[u8]) -> serde_json::Value {
    serde_json::from_slice(buffer).expect("command output is JSON")
}
