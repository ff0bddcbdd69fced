//! Core domain types for the zonefeed backend.
//!
//! The crate owns the shapes that flow through zone ingestion: raw GeoJSON
//! features, the canonical [`ZoneRecord`] built from them, and the
//! [`RemoteStore`] seam that ingestion submits rows through. It also carries
//! the priority colour buckets served to the map frontend.
//!
//! Nothing here performs I/O. Adapters for files and HTTP live in
//! `zonefeed-data`.

#![forbid(unsafe_code)]

mod feature;
mod normalise;
mod priority;
pub mod store;
mod truthy;
mod zone;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use feature::{FeatureCollection, RawFeature};
pub use normalise::{
    DISTRICT_KEY, NAME_KEYS, ParseSkipPolicyError, SCREENED_KEY, SkipPolicy, SkipReason,
    ZONE_ID_KEY, normalise_feature,
};
pub use priority::{DUMMY_PRIORITIES, PriorityColor, PriorityEntry, dummy_priority_list};
pub use store::{InsertKind, RemoteStore, StoreError, StoreResponse};
pub use zone::ZoneRecord;
