use std::sync::Arc;
use std::time::Duration;

use shared::models::{OrderStatus, StockDirection};

use super::{MemoryLedger, MemoryStore};
use crate::stock::{StockService, reservation_effect};

fn service(ledger: &Arc<MemoryLedger>, store: &Arc<MemoryStore>) -> StockService {
    StockService::new(ledger.clone(), store.clone(), Duration::from_secs(5))
}

#[test]
fn effect_table_covers_the_qualifying_boundary() {
    use OrderStatus::*;
    use StockDirection::*;

    // entering the qualifying set
    assert_eq!(reservation_effect(Pending, Approved), Some(Reserve));
    assert_eq!(
        reservation_effect(PendingCancellation, Approved),
        Some(Reserve),
        "declining a cancellation on an approved order re-reserves"
    );

    // leaving the qualifying set
    assert_eq!(reservation_effect(Approved, Cancelled), Some(Release));
    assert_eq!(reservation_effect(InTransit, Cancelled), Some(Release));
    assert_eq!(reservation_effect(Complete, Cancelled), Some(Release));
    assert_eq!(
        reservation_effect(Approved, PendingCancellation),
        Some(Release)
    );

    // moves on one side of the boundary
    assert_eq!(reservation_effect(Approved, InTransit), None);
    assert_eq!(reservation_effect(InTransit, Complete), None);
    assert_eq!(reservation_effect(Pending, PendingCancellation), None);
    assert_eq!(reservation_effect(PendingCancellation, Pending), None);
    assert_eq!(reservation_effect(PendingCancellation, Cancelled), None);
    assert_eq!(reservation_effect(Pending, Cancelled), None);
}

#[tokio::test]
async fn non_crossing_transition_touches_nothing() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::InTransit);
    ledger.push_item("o1", "p1", 10);
    store.seed("p1", Some(50), Some(40), 10);

    let outcome = service(&ledger, &store)
        .handle_transition("o1", OrderStatus::Approved, OrderStatus::InTransit)
        .await;

    assert!(outcome.is_none());
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.display_quantity, Some(40));
    assert_eq!(p1.reserved_quantity, 10);
}

#[tokio::test]
async fn approval_adjusts_then_converges() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 30);
    store.seed("p1", Some(100), Some(100), 0);

    let outcome = service(&ledger, &store)
        .handle_transition("o1", OrderStatus::Pending, OrderStatus::Approved)
        .await
        .expect("crossing must produce stock work");

    assert_eq!(outcome.direction, StockDirection::Reserve);
    assert!(outcome.adjustment.success);
    assert!(outcome.sync.success);

    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 30);
    assert_eq!(p1.display_quantity, Some(70));
}

#[tokio::test]
async fn cancel_then_decline_round_trip() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());
    let svc = service(&ledger, &store);

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 30);
    store.seed("p1", Some(100), Some(100), 0);

    svc.handle_transition("o1", OrderStatus::Pending, OrderStatus::Approved)
        .await;
    assert_eq!(store.snapshot("p1").unwrap().reserved_quantity, 30);

    // customer asks to cancel: the order stops holding stock
    ledger.set_status("o1", OrderStatus::PendingCancellation);
    let outcome = svc
        .handle_transition(
            "o1",
            OrderStatus::Approved,
            OrderStatus::PendingCancellation,
        )
        .await
        .unwrap();
    assert_eq!(outcome.direction, StockDirection::Release);
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 0);
    assert_eq!(p1.display_quantity, Some(100));

    // admin declines the cancellation: reservation comes back
    ledger.set_status("o1", OrderStatus::Approved);
    let outcome = svc
        .handle_transition(
            "o1",
            OrderStatus::PendingCancellation,
            OrderStatus::Approved,
        )
        .await
        .unwrap();
    assert_eq!(outcome.direction, StockDirection::Reserve);
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 30);
    assert_eq!(p1.display_quantity, Some(70));
}

#[tokio::test]
async fn adjuster_drift_is_repaired_by_the_sync_step() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    // a concurrent pass already wrote a wrong reservation
    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 10);
    store.seed("p1", Some(50), Some(13), 99);

    let outcome = service(&ledger, &store)
        .handle_transition("o1", OrderStatus::Pending, OrderStatus::Approved)
        .await
        .unwrap();

    assert!(outcome.sync.success);
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 10, "authoritative pass wins");
    assert_eq!(p1.display_quantity, Some(40));
}

#[tokio::test]
async fn resync_times_out_with_a_retryable_report() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 5);
    store.seed("p1", Some(10), Some(10), 0);
    store.hang_writes();

    let svc = StockService::new(
        ledger.clone(),
        store.clone(),
        Duration::from_millis(50),
    );
    let report = svc.resync().await;

    assert!(!report.success);
    let message = report.error.expect("timeout must carry a message");
    assert!(message.contains("retry"), "caller is told to retry: {message}");
}

#[tokio::test]
async fn repeated_resync_is_idempotent() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 6);
    store.seed("p1", Some(9), Some(9), 0);

    let svc = service(&ledger, &store);
    svc.resync().await;
    let first = store.dump();
    svc.resync().await;
    svc.resync().await;
    assert_eq!(first, store.dump());
}
