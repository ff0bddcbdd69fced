//! Behavioural tests for zone ingestion.
//!
//! The remote store is replaced by [`RecordingStore`] so the scenarios run
//! without network access.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use std::cell::RefCell;
use tempfile::TempDir;
use zonefeed_core::test_support::RecordingStore;
use zonefeed_core::{InsertKind, SkipPolicy, SkipReason};
use zonefeed_data::{IngestOptions, IngestReport, ZoneIngestError, ingest_zones};

/// Input location plus the directory that keeps it alive.
type InputCell = RefCell<Option<(TempDir, Utf8PathBuf)>>;
type StoreCell = RefCell<Option<RecordingStore>>;
type OptionsCell = RefCell<IngestOptions>;
type OutcomeCell = RefCell<Option<Result<IngestReport, ZoneIngestError>>>;

#[fixture]
fn input() -> InputCell {
    RefCell::new(None)
}

#[fixture]
fn store() -> StoreCell {
    RefCell::new(None)
}

#[fixture]
fn options() -> OptionsCell {
    RefCell::new(IngestOptions::default())
}

#[fixture]
fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn temp_path(name: &str) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("temp path is UTF-8");
    (dir, path)
}

fn with_report(outcome: &OutcomeCell, check: impl FnOnce(&IngestReport)) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref() {
        Some(Ok(report)) => check(report),
        other => panic!("expected a report, got {other:?}"),
    }
}

fn with_error(outcome: &OutcomeCell, check: impl FnOnce(&ZoneIngestError)) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref() {
        Some(Err(err)) => check(err),
        other => panic!("expected an error, got {other:?}"),
    }
}

// --- Given steps ---

#[given("a zone file with two valid features and one without a district")]
fn zone_file(#[from(input)] input: &InputCell) {
    let (dir, path) = temp_path("residential_zones.geojson");
    let document = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "Zona_ID": 1, "District": "Centro", "Zone_Nam_1": "Alta" }, "geometry": null },
            { "type": "Feature", "properties": { "Zona_ID": 2, "Name": "Baja" }, "geometry": null },
            { "type": "Feature", "properties": { "Zona_ID": 3, "District": "Sur", "Name": "Costa", "screened": 4 }, "geometry": null }
        ]
    });
    std::fs::write(&path, document.to_string()).expect("write zone file");
    *input.borrow_mut() = Some((dir, path));
}

#[given("a zone file path that does not exist")]
fn missing_zone_file(#[from(input)] input: &InputCell) {
    *input.borrow_mut() = Some(temp_path("absent.geojson"));
}

#[given("a store that accepts every insert")]
fn accepting_store(#[from(store)] store: &StoreCell) {
    *store.borrow_mut() = Some(RecordingStore::accepting());
}

#[given("a store that rejects inserts with status 409")]
fn rejecting_store(#[from(store)] store: &StoreCell) {
    *store.borrow_mut() = Some(RecordingStore::with_status(
        409,
        json!({ "message": "duplicate key value violates unique constraint" }),
    ));
}

#[given("ingestion fails on invalid features")]
fn strict_policy(#[from(options)] options: &OptionsCell) {
    let strict = options.borrow().clone().with_skip_policy(SkipPolicy::Fail);
    *options.borrow_mut() = strict;
}

// --- When steps ---

#[when("the zones are ingested")]
fn ingest(
    #[from(input)] input: &InputCell,
    #[from(store)] store: &StoreCell,
    #[from(options)] options: &OptionsCell,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let input_guard = input.borrow();
    let (_, path) = input_guard.as_ref().expect("input must be initialised");
    let store_guard = store.borrow();
    let recording = store_guard.as_ref().expect("store must be initialised");
    *outcome.borrow_mut() = Some(ingest_zones(path, recording, &options.borrow()));
}

// --- Then steps ---

#[then("one batch of 2 records is submitted")]
fn one_batch(#[from(store)] store: &StoreCell, #[from(outcome)] outcome: &OutcomeCell) {
    with_report(outcome, |report| assert_eq!(report.inserted, 2));
    let guard = store.borrow();
    let calls = guard.as_ref().expect("store must be initialised").calls();
    assert_eq!(calls.len(), 1, "expected exactly one request");
    assert_eq!(calls[0].kind, InsertKind::Batch);
    assert_eq!(calls[0].payload.as_array().map(Vec::len), Some(2));
}

#[then("1 feature is reported as skipped")]
fn one_skipped(#[from(outcome)] outcome: &OutcomeCell) {
    with_report(outcome, |report| {
        assert_eq!(report.features, 3);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].reason, SkipReason::MissingDistrict);
    });
}

#[then("ingestion fails at feature 1")]
fn fails_at_feature(#[from(outcome)] outcome: &OutcomeCell) {
    with_error(outcome, |err| {
        assert!(
            matches!(err, ZoneIngestError::InvalidFeature { index: 1, .. }),
            "expected InvalidFeature at index 1, got {err:?}"
        );
    });
}

#[then("no request reaches the store")]
fn no_request(#[from(store)] store: &StoreCell) {
    let guard = store.borrow();
    assert!(guard.as_ref().expect("store must be initialised").calls().is_empty());
}

#[then("ingestion fails with store status 409")]
fn fails_with_status(#[from(outcome)] outcome: &OutcomeCell) {
    with_error(outcome, |err| match err {
        ZoneIngestError::Store { source, .. } => assert_eq!(source.status(), Some(409)),
        other => panic!("expected a store error, got {other:?}"),
    });
}

#[then("ingestion fails because the file is missing")]
fn fails_missing(#[from(outcome)] outcome: &OutcomeCell) {
    with_error(outcome, |err| {
        assert!(
            matches!(
                err,
                ZoneIngestError::Read(zonefeed_data::GeoJsonReadError::NotFound { .. })
            ),
            "expected NotFound, got {err:?}"
        );
    });
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/zone_ingest.feature", name = $title)]
        fn $fn_name(input: InputCell, store: StoreCell, options: OptionsCell, outcome: OutcomeCell) {
            let _ = (input, store, options, outcome);
        }
    };
}

register_scenario!(
    valid_zones_submitted_as_batch,
    "valid zones are submitted as one batch"
);
register_scenario!(
    strict_ingestion_stops_early,
    "strict ingestion stops at the first invalid feature"
);
register_scenario!(rejected_batch_is_reported, "a rejected batch is reported");
register_scenario!(missing_zone_file_is_reported, "a missing zone file is reported");
