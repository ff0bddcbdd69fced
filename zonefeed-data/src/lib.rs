//! Data access and ingestion logic for zonefeed.
//!
//! Responsibilities:
//! - Read GeoJSON zone documents from disk.
//! - Drive zone ingestion into a remote store.
//! - Provide the HTTP adapter for the `RemoteStore` seam.
//! - Convert shapefiles into GeoJSON for the map frontend.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `zonefeed-core`).
//! - Keep blocking I/O off async executors; the HTTP store bridges to its
//!   own runtime.
//!
//! Invariants:
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod convert;
mod geojson;
mod ingest;
pub mod store;

pub use convert::{ConvertError, ConvertSummary, convert_shapefile};
pub use geojson::{GeoJsonReadError, read_feature_collection};
pub use ingest::{
    DEFAULT_ZONE_TABLE, IngestOptions, IngestReport, SkippedFeature, ZoneIngestError,
    ingest_zones, normalise_collection,
};
pub use store::{HttpRemoteStore, RemoteStoreConfig, StoreBuildError};
