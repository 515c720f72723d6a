//! DispatchStorageEngine behaviour against an in-memory and a file-backed
//! database.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, Utc};
use dispatch_core::config::StorageConfig;
use dispatch_core::errors::StorageError;
use dispatch_core::settlement::SettlementCalculator;
use dispatch_core::traits::{CasOutcome, ICollectorDirectory, IDropOffDirectory, IRequestStore};
use dispatch_core::types::{AvailabilityWindow, RequestPatch};
use dispatch_core::*;
use dispatch_storage::migrations::CURRENT_VERSION;
use dispatch_storage::DispatchStorageEngine;

fn draft() -> PickupDraft {
    PickupDraft {
        origin: Coordinate::new(12.9716, 77.5946).unwrap(),
        categories: [ScrapCategory::Plastic, ScrapCategory::EWaste].into_iter().collect(),
        preferred_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        preferred_time: "10:30".parse().unwrap(),
        pickup_address: "12 MG Road".into(),
    }
}

fn pending(user: &str, collector: &str) -> PickupRequest {
    PickupRequest::new_pending("sub-1", user, collector, &draft(), Utc::now())
}

fn collector(id: &str) -> Collector {
    Collector {
        id: id.into(),
        name: "Asha".into(),
        home: Coordinate::new(12.97, 77.59).unwrap(),
        categories: [ScrapCategory::Metal, ScrapCategory::EWaste].into_iter().collect(),
        availability: AvailabilityWindow::parse("08:00", "18:30").unwrap(),
        active: true,
    }
}

#[test]
fn open_in_memory_migrates() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    assert_eq!(engine.schema_version().unwrap(), CURRENT_VERSION);
    assert!(engine.path().is_none());
}

#[test]
fn request_round_trips() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let request = pending("u1", "c1");
    engine.insert_request(&request).unwrap();

    let loaded = engine.get_request(&request.id).unwrap().unwrap();
    assert_eq!(loaded, request);
    assert!(engine.get_request("missing").unwrap().is_none());
}

#[test]
fn duplicate_insert_rejected() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let request = pending("u1", "c1");
    engine.insert_request(&request).unwrap();
    let err = engine.insert_request(&request).unwrap_err();
    assert!(matches!(err, StorageError::Duplicate { .. }), "{err:?}");
}

#[test]
fn conditional_update_applies_then_conflicts() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let request = pending("u1", "c1");
    engine.insert_request(&request).unwrap();

    let accept = RequestPatch::status(RequestStatus::Accepted);
    match engine
        .conditional_update(&request.id, RequestStatus::Pending, &accept)
        .unwrap()
    {
        CasOutcome::Applied(row) => {
            assert_eq!(row.status, RequestStatus::Accepted);
            assert!(row.updated_at >= row.created_at);
        }
        other => panic!("expected applied, got {other:?}"),
    }

    let reject = RequestPatch::status(RequestStatus::Rejected);
    assert_eq!(
        engine
            .conditional_update(&request.id, RequestStatus::Pending, &reject)
            .unwrap(),
        CasOutcome::Conflict {
            current: RequestStatus::Accepted
        }
    );
    assert_eq!(
        engine
            .conditional_update("missing", RequestStatus::Pending, &reject)
            .unwrap(),
        CasOutcome::NotFound
    );
}

#[test]
fn completion_patch_persists_itemization() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let request = pending("u1", "c1");
    engine.insert_request(&request).unwrap();
    engine
        .conditional_update(
            &request.id,
            RequestStatus::Pending,
            &RequestPatch::status(RequestStatus::Accepted),
        )
        .unwrap();

    let items = vec![
        ScrapItem::new(ScrapCategory::Plastic, 2.0),
        ScrapItem::new(ScrapCategory::Metal, 1.0),
    ];
    let settlement = SettlementCalculator::new(PriceTable::standard())
        .settle(&items)
        .unwrap();
    let patch = RequestPatch::completion(items.clone(), settlement, Some("pay-1".into()));
    engine
        .conditional_update(&request.id, RequestStatus::Accepted, &patch)
        .unwrap();

    let done = engine.get_request(&request.id).unwrap().unwrap();
    assert_eq!(done.status, RequestStatus::Completed);
    assert_eq!(done.scraps.as_deref(), Some(items.as_slice()));
    assert_eq!(done.settlement.unwrap().total_amount, 80.0);
    assert_eq!(done.payment_reference.as_deref(), Some("pay-1"));
}

#[test]
fn listings_filter_and_order_newest_first() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let mut older = pending("u1", "c1");
    older.created_at = now - Duration::minutes(5);
    let newer = pending("u1", "c2");
    let other_user = pending("u2", "c1");
    for r in [&older, &newer, &other_user] {
        engine.insert_request(r).unwrap();
    }
    engine
        .conditional_update(
            &older.id,
            RequestStatus::Pending,
            &RequestPatch::status(RequestStatus::Accepted),
        )
        .unwrap();

    let mine: Vec<String> = engine
        .requests_for_user("u1")
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(mine, vec![newer.id.clone(), older.id.clone()]);

    let c1_pending = engine
        .requests_for_collector("c1", Some(RequestStatus::Pending))
        .unwrap();
    assert_eq!(c1_pending.len(), 1);
    assert_eq!(c1_pending[0].id, other_user.id);
    assert_eq!(engine.requests_for_collector("c1", None).unwrap().len(), 2);
    assert_eq!(
        engine
            .requests_with_status(RequestStatus::Accepted)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn collectors_upsert_and_list() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let mut c = collector("c2");
    engine.upsert_collector(&collector("c1")).unwrap();
    engine.upsert_collector(&c).unwrap();

    c.active = false;
    c.categories = BTreeSet::from([ScrapCategory::Paper]);
    engine.upsert_collector(&c).unwrap();

    let listed = engine.list_collectors().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "c1");
    assert_eq!(listed[1], c);
    assert_eq!(engine.get_collector("c2").unwrap().unwrap().categories.len(), 1);
    assert!(engine.get_collector("nope").unwrap().is_none());
}

#[test]
fn drop_off_points_round_trip() {
    let engine = DispatchStorageEngine::open_in_memory().unwrap();
    let point = DropOffPoint {
        id: "d1".into(),
        name: "Ward 12 Depot".into(),
        location: Coordinate::new(12.95, 77.6).unwrap(),
        address: "Depot Road".into(),
        active: true,
    };
    engine.upsert_drop_off_point(&point).unwrap();
    assert_eq!(engine.list_drop_off_points().unwrap(), vec![point]);
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        db_path: Some(dir.path().join("dispatch.db").to_string_lossy().into_owned()),
        read_pool_size: 2,
    };
    let request = pending("u1", "c1");
    {
        let engine = DispatchStorageEngine::from_config(&config).unwrap();
        assert!(engine.is_wal_mode());
        engine.insert_request(&request).unwrap();
    }
    let reopened = DispatchStorageEngine::from_config(&config).unwrap();
    assert_eq!(reopened.schema_version().unwrap(), CURRENT_VERSION);
    assert_eq!(reopened.get_request(&request.id).unwrap().unwrap(), request);
}

#[test]
fn corrupt_row_is_reported_not_panicked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    let engine = DispatchStorageEngine::open(&path, 1).unwrap();
    let request = pending("u1", "c1");
    engine.insert_request(&request).unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute(
        "UPDATE pickup_requests SET categories = 'not json' WHERE id = ?1",
        [&request.id],
    )
    .unwrap();

    let err = engine.get_request(&request.id).unwrap_err();
    assert!(matches!(err, StorageError::CorruptRow { .. }), "{err:?}");
}
