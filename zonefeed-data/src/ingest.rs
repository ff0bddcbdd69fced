//! Zone ingestion: read GeoJSON, normalise every feature, submit one batch.

use camino::Utf8Path;
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;
use zonefeed_core::{
    FeatureCollection, RemoteStore, SkipPolicy, SkipReason, StoreError, StoreResponse, ZoneRecord,
    normalise_feature,
};

use crate::geojson::{GeoJsonReadError, read_feature_collection};

/// Remote table receiving zone records unless overridden.
pub const DEFAULT_ZONE_TABLE: &str = "residential_zones";

/// Settings for one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Target table for the batch insert.
    pub table: String,
    /// What to do with features that fail normalisation.
    pub skip_policy: SkipPolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_ZONE_TABLE.to_owned(),
            skip_policy: SkipPolicy::default(),
        }
    }
}

impl IngestOptions {
    /// Options targeting `table` with the default skip policy.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Replace the skip policy.
    #[must_use]
    pub const fn with_skip_policy(mut self, skip_policy: SkipPolicy) -> Self {
        self.skip_policy = skip_policy;
        self
    }
}

/// A feature dropped during normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedFeature {
    /// Zero-based position in the `features` array.
    pub index: usize,
    /// Why the feature was dropped.
    pub reason: SkipReason,
}

/// Outcome of a successful ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Features present in the input document.
    pub features: usize,
    /// Records submitted in the batch.
    pub inserted: usize,
    /// Features dropped by the normaliser, in document order.
    pub skipped: Vec<SkippedFeature>,
    /// Store response, `None` when there was nothing to send.
    pub response: Option<StoreResponse>,
}

impl IngestReport {
    /// Number of dropped features.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Errors that abort an ingestion run.
#[derive(Debug, Error)]
pub enum ZoneIngestError {
    /// The GeoJSON input could not be loaded.
    #[error(transparent)]
    Read(#[from] GeoJsonReadError),
    /// A feature failed normalisation under [`SkipPolicy::Fail`].
    #[error("feature {index} is invalid: {reason}")]
    InvalidFeature {
        /// Zero-based feature position.
        index: usize,
        /// Normalisation failure.
        reason: SkipReason,
    },
    /// A record could not be encoded as JSON.
    #[error("failed to serialise zone record: {0}")]
    Serialise(#[source] serde_json::Error),
    /// The remote store refused or failed the batch.
    #[error("batch insert into {table} failed: {source}")]
    Store {
        /// Target table.
        table: String,
        /// Store failure.
        #[source]
        source: StoreError,
    },
}

/// Normalise every feature, collecting records and skips in document order.
///
/// Under [`SkipPolicy::Fail`] the first skipped feature aborts with
/// [`ZoneIngestError::InvalidFeature`].
///
/// # Errors
///
/// Returns [`ZoneIngestError::InvalidFeature`] only under
/// [`SkipPolicy::Fail`].
pub fn normalise_collection(
    collection: &FeatureCollection,
    policy: SkipPolicy,
) -> Result<(Vec<ZoneRecord>, Vec<SkippedFeature>), ZoneIngestError> {
    let mut records = Vec::with_capacity(collection.len());
    let mut skipped = Vec::new();
    for (index, feature) in collection.iter().enumerate() {
        match normalise_feature(feature) {
            Ok(record) => records.push(record),
            Err(reason) if policy == SkipPolicy::Fail => {
                return Err(ZoneIngestError::InvalidFeature { index, reason });
            }
            Err(reason) => {
                debug!("skipping feature {index}: {reason}");
                skipped.push(SkippedFeature { index, reason });
            }
        }
    }
    Ok((records, skipped))
}

/// Read the GeoJSON document at `path` and submit its zones as one batch.
///
/// No request is sent when no feature survives normalisation. A failed batch
/// leaves nothing to resume; callers re-run from scratch.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use zonefeed_data::{HttpRemoteStore, IngestOptions, RemoteStoreConfig, ingest_zones};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = HttpRemoteStore::with_config(RemoteStoreConfig::new(
///     "https://project.supabase.co",
///     "service-key",
/// ))?;
/// let report = ingest_zones(
///     Utf8Path::new("residential_zones.geojson"),
///     &store,
///     &IngestOptions::default(),
/// )?;
/// println!("inserted {} zones", report.inserted);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`ZoneIngestError`] when reading, strict normalisation,
/// serialisation or the remote insert fails.
pub fn ingest_zones(
    path: &Utf8Path,
    store: &dyn RemoteStore,
    options: &IngestOptions,
) -> Result<IngestReport, ZoneIngestError> {
    let collection = read_feature_collection(path)?;
    info!("read {} features from {path}", collection.len());

    let (records, skipped) = normalise_collection(&collection, options.skip_policy)?;
    if !skipped.is_empty() {
        warn!(
            "skipped {} of {} features during normalisation",
            skipped.len(),
            collection.len()
        );
    }

    let rows = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(ZoneIngestError::Serialise)?;

    let response = if rows.is_empty() {
        info!("no zone records to insert into {}", options.table);
        None
    } else {
        info!("inserting {} zone records into {}", rows.len(), options.table);
        let accepted = store
            .insert_batch(&options.table, &rows)
            .map_err(|source| ZoneIngestError::Store {
                table: options.table.clone(),
                source,
            })?;
        Some(accepted)
    };

    Ok(IngestReport {
        features: collection.len(),
        inserted: rows.len(),
        skipped,
        response,
    })
}
