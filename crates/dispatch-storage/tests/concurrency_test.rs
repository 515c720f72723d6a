//! Two independent engines sharing one database file race on the same
//! request. The conditional update must pick exactly one winner.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use dispatch_core::errors::ErrorKind;
use dispatch_core::traits::test_helpers::StubPaymentGateway;
use dispatch_core::traits::{ICollectorDirectory, IRequestStore};
use dispatch_core::types::AvailabilityWindow;
use dispatch_core::*;
use dispatch_storage::DispatchStorageEngine;

fn wire(path: &Path) -> DispatchEngine {
    let store = Arc::new(DispatchStorageEngine::open(path, 2).unwrap());
    DispatchEngine::new(
        DispatchConfig::default(),
        store.as_request_store(),
        store.as_collector_directory(),
        store.as_drop_off_directory(),
        Arc::new(StubPaymentGateway::new()),
    )
    .unwrap()
}

fn seed(path: &Path) -> Vec<String> {
    let store = DispatchStorageEngine::open(path, 1).unwrap();
    store
        .upsert_collector(&Collector {
            id: "c1".into(),
            name: "Asha".into(),
            home: Coordinate::new(0.0, 0.01).unwrap(),
            categories: [ScrapCategory::Metal].into_iter().collect(),
            availability: AvailabilityWindow::parse("00:00", "23:59").unwrap(),
            active: true,
        })
        .unwrap();
    let draft = PickupDraft {
        origin: Coordinate::new(0.0, 0.0).unwrap(),
        categories: [ScrapCategory::Metal].into_iter().collect(),
        preferred_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        preferred_time: "12:00".parse().unwrap(),
        pickup_address: "1 Test Lane".into(),
    };
    (0..10)
        .map(|i| {
            let r = PickupRequest::new_pending(
                &format!("sub-{i}"),
                "u1",
                "c1",
                &draft,
                chrono::Utc::now(),
            );
            store.insert_request(&r).unwrap();
            r.id
        })
        .collect()
}

#[test]
fn accept_and_reject_from_two_processes_have_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let ids = seed(&path);

    let left = Arc::new(wire(&path));
    let right = Arc::new(wire(&path));

    for id in &ids {
        let barrier = Arc::new(Barrier::new(2));
        let spawn = |engine: Arc<DispatchEngine>, accept: bool| {
            let barrier = Arc::clone(&barrier);
            let id = id.clone();
            thread::spawn(move || {
                barrier.wait();
                if accept {
                    engine.accept("c1", &id)
                } else {
                    engine.reject("c1", &id)
                }
            })
        };
        let a = spawn(Arc::clone(&left), true);
        let b = spawn(Arc::clone(&right), false);
        let results = [a.join().unwrap(), b.join().unwrap()];

        let winners: Vec<RequestStatus> = results
            .iter()
            .filter_map(|r| r.as_ref().ok().map(|row| row.status))
            .collect();
        assert_eq!(winners.len(), 1, "request {id}: {results:?}");
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(e) if e.is_conflict())));
        assert_eq!(left.get_request(id).unwrap().status, winners[0]);
        assert_eq!(right.get_request(id).unwrap().status, winners[0]);
    }
}

#[test]
fn full_lifecycle_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifecycle.db");
    let ids = seed(&path);
    let engine = wire(&path);

    engine.accept("c1", &ids[0]).unwrap();
    let done = engine
        .complete("c1", &ids[0], vec![ScrapItem::new(ScrapCategory::Metal, 2.5)])
        .unwrap();
    assert_eq!(done.status, RequestStatus::Completed);
    assert_eq!(done.settlement.unwrap().total_amount, 100.0);
    assert!(done.payment_reference.is_some());

    assert_eq!(engine.pending_for_collector("c1").unwrap().len(), ids.len() - 1);
    assert!(engine.active_bookings("c1").unwrap().is_empty());

    let impact = engine.user_impact("u1").unwrap();
    assert_eq!(impact.completed_pickups, 1);
    assert_eq!(impact.impact.co2_kg, 12.5);

    let board = engine.leaderboard(0).unwrap();
    assert_eq!(board[0].user_id, "u1");
    assert_eq!(board[0].total_weight_kg, 2.5);
}

#[test]
fn overflowing_itemization_leaves_sqlite_row_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overflow.db");
    let ids = seed(&path);
    let engine = wire(&path);

    engine.accept("c1", &ids[0]).unwrap();
    let err = engine
        .complete("c1", &ids[0], vec![ScrapItem::new(ScrapCategory::Metal, 1e307)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let row = engine.get_request(&ids[0]).unwrap();
    assert_eq!(row.status, RequestStatus::Accepted);
    assert!(row.settlement.is_none());
    assert!(row.payment_reference.is_none());
}
