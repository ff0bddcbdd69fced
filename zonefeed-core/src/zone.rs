//! Canonical residential zone rows built by the normaliser.

use serde::Serialize;
use serde_json::Value;

use crate::RawFeature;
use crate::normalise::normalise_feature;

/// Canonical residential zone row submitted to the remote store.
///
/// Records are built only by the normaliser and never change afterwards.
/// `priority` and `rank` are placeholders filled in later by an external
/// scoring process, so ingestion always writes them as `null`.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use zonefeed_core::{RawFeature, ZoneRecord};
///
/// let feature: RawFeature = serde_json::from_value(json!({
///     "properties": { "Zona_ID": 7, "District": "North", "Name": "Riverside" }
/// }))?;
/// let record = ZoneRecord::from_feature(&feature).expect("feature is complete");
/// assert_eq!(record.zone_id(), 7);
/// assert_eq!(record.zone_name(), "Riverside");
/// assert_eq!(record.screened(), 0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRecord {
    zone_id: i64,
    zone_name: String,
    district: Value,
    screened: i64,
    priority: Option<f64>,
    rank: Option<i64>,
}

impl ZoneRecord {
    pub(crate) const fn new(zone_id: i64, zone_name: String, district: Value, screened: i64) -> Self {
        Self {
            zone_id,
            zone_name,
            district,
            screened,
            priority: None,
            rank: None,
        }
    }

    /// Normalise a feature, discarding the reason when it is skipped.
    #[must_use]
    pub fn from_feature(feature: &RawFeature) -> Option<Self> {
        normalise_feature(feature).ok()
    }

    /// Integer zone identifier taken from `Zona_ID`.
    #[must_use]
    pub const fn zone_id(&self) -> i64 {
        self.zone_id
    }

    /// Display name resolved from `Zone_Nam_1` or `Name`.
    #[must_use]
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    /// District value carried through with its source JSON type.
    #[must_use]
    pub const fn district(&self) -> &Value {
        &self.district
    }

    /// Screening count, zero when the source omitted it.
    #[must_use]
    pub const fn screened(&self) -> i64 {
        self.screened
    }

    /// Priority placeholder; always `None` at ingestion time.
    #[must_use]
    pub const fn priority(&self) -> Option<f64> {
        self.priority
    }

    /// Rank placeholder; always `None` at ingestion time.
    #[must_use]
    pub const fn rank(&self) -> Option<i64> {
        self.rank
    }
}
