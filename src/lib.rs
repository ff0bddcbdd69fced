//! Facade crate for the zonefeed zone ingestion toolkit.
//!
//! This crate re-exports the core domain types and, behind the `data`
//! feature, the GeoJSON ingestion pipeline, remote store client and
//! shapefile converter.

#![forbid(unsafe_code)]

pub use zonefeed_core::{
    FeatureCollection, InsertKind, PriorityColor, PriorityEntry, RawFeature, RemoteStore,
    SkipPolicy, SkipReason, StoreError, StoreResponse, ZoneRecord, dummy_priority_list,
    normalise_feature,
};

#[cfg(feature = "data")]
pub use zonefeed_data::{
    ConvertError, ConvertSummary, HttpRemoteStore, IngestOptions, IngestReport,
    RemoteStoreConfig, ZoneIngestError, convert_shapefile, ingest_zones,
};
