use std::sync::Arc;

use shared::models::{OrderStatus, StockDirection};

use super::{MemoryLedger, MemoryStore};
use crate::stock::StockAdjuster;

fn adjuster(ledger: &Arc<MemoryLedger>, store: &Arc<MemoryStore>) -> StockAdjuster {
    StockAdjuster::new(ledger.clone(), store.clone())
}

#[tokio::test]
async fn reserve_moves_stock_from_display_to_reserved() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 10);
    store.seed("p1", Some(100), Some(70), 30);

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Reserve)
        .await;

    assert!(report.success);
    assert_eq!(report.adjusted, 1);

    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.display_quantity, Some(60));
    assert_eq!(p1.reserved_quantity, 40);
    assert_eq!(p1.current_quantity, Some(100));
}

#[tokio::test]
async fn release_hands_stock_back() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Cancelled);
    ledger.push_item("o1", "p1", 10);
    store.seed("p1", Some(100), Some(60), 40);

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Release)
        .await;

    assert!(report.success);
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.display_quantity, Some(70));
    assert_eq!(p1.reserved_quantity, 30);
}

#[tokio::test]
async fn missing_rows_default_to_zero() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 5);

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Reserve)
        .await;

    assert!(report.success);
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.display_quantity, Some(0), "display clamps at zero");
    assert_eq!(p1.reserved_quantity, 5);
}

#[tokio::test]
async fn release_never_drives_reserved_negative() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Cancelled);
    ledger.push_item("o1", "p1", 10);
    store.seed("p1", Some(20), Some(16), 4);

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Release)
        .await;

    assert!(report.success);
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 0);
    assert_eq!(p1.display_quantity, Some(26));
}

#[tokio::test]
async fn repeated_lines_collapse_to_one_delta_per_product() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "p1", 2);
    ledger.push_item("o1", "p1", 3);
    ledger.push_item("o1", " p1 ", 1);
    store.seed("p1", Some(50), Some(50), 0);

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Reserve)
        .await;

    assert!(report.success);
    assert_eq!(report.adjusted, 1, "one upsert per distinct product");
    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 6);
    assert_eq!(p1.display_quantity, Some(44));
}

#[tokio::test]
async fn per_product_failures_do_not_stop_the_batch() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    ledger.push_order("o1", OrderStatus::Approved);
    ledger.push_item("o1", "pa", 5);
    ledger.push_item("o1", "pb", 7);
    store.seed("pa", Some(10), Some(10), 0);
    store.seed("pb", Some(10), Some(10), 0);
    store.fail_writes_for("pa");

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Reserve)
        .await;

    assert!(!report.success);
    assert_eq!(report.adjusted, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].product_id, "pa");

    let pb = store.snapshot("pb").unwrap();
    assert_eq!(pb.reserved_quantity, 7);
}

#[tokio::test]
async fn line_item_fetch_failure_aborts() {
    let ledger = Arc::new(MemoryLedger::new());
    let store = Arc::new(MemoryStore::new());

    store.seed("p1", Some(10), Some(10), 0);
    ledger.fail_reads();

    let report = adjuster(&ledger, &store)
        .apply_reservation_delta("o1", StockDirection::Reserve)
        .await;

    assert!(!report.success);
    assert!(report.error.is_some());
    assert_eq!(report.adjusted, 0);

    let p1 = store.snapshot("p1").unwrap();
    assert_eq!(p1.reserved_quantity, 0);
}
