//! Reconciliation Engine
//!
//! The authoritative convergence pass: recomputes every product's reserved
//! and display quantities from the Order Ledger and writes corrections to
//! the projection store. A pass is a pure function of the ledger contents
//! at read time, so repeated or reordered passes settle on the same state;
//! the incremental adjuster may drift, this engine always wins.

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{OrderStatus, SyncError, SyncReport};

use super::reservation::compute_reservations;
use super::traits::{OrderLedger, StockPatch, StockRow, StockStore};

pub struct StockReconciler {
    ledger: Arc<dyn OrderLedger>,
    store: Arc<dyn StockStore>,
}

impl StockReconciler {
    pub fn new(ledger: Arc<dyn OrderLedger>, store: Arc<dyn StockStore>) -> Self {
        Self { ledger, store }
    }

    /// Converge the entire product universe
    ///
    /// Ledger or stock *read* failures abort the pass with nothing written.
    /// Per-product *write* failures are isolated: recorded in the report,
    /// remaining products still processed. Products whose counted quantity
    /// is unknown get only their reservation written and are reported as
    /// degraded, not failed.
    pub async fn sync_all(&self) -> SyncReport {
        let started = std::time::Instant::now();

        // 1. Qualifying orders and their line items → expected reservations
        let orders = match self.ledger.list_orders(&OrderStatus::QUALIFYING).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Stock sync aborted: cannot list qualifying orders");
                return SyncReport::failed(e.to_string());
            }
        };

        let order_ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        let items = if order_ids.is_empty() {
            Vec::new()
        } else {
            match self.ledger.list_line_items(&order_ids).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!(error = %e, "Stock sync aborted: cannot list line items");
                    return SyncReport::failed(e.to_string());
                }
            }
        };

        let expected = compute_reservations(&orders, &items);

        // 2a. Current rows for every product with an expected reservation
        let fetches = expected.keys().map(|product_id| {
            let store = self.store.clone();
            let product_id = product_id.clone();
            async move {
                let row = store.get_stock(&product_id).await;
                (product_id, row)
            }
        });
        let mut current: HashMap<String, Option<StockRow>> = HashMap::new();
        for (product_id, result) in futures::future::join_all(fetches).await {
            match result {
                Ok(row) => {
                    current.insert(product_id, row);
                }
                Err(e) => {
                    tracing::error!(product_id = %product_id, error = %e, "Stock sync aborted: baseline read failed");
                    return SyncReport::failed(e.to_string());
                }
            }
        }

        // 2b. Full scan for the release pass (products whose last qualifying
        // order has gone away since the previous run)
        let all_rows = match self.store.list_all_stock().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "Stock sync aborted: full stock scan failed");
                return SyncReport::failed(e.to_string());
            }
        };

        let mut report = SyncReport {
            success: true,
            ..SyncReport::default()
        };

        // 3. Converge every product with an expected reservation. Writing an
        // already-correct value is a harmless no-op; idempotence needs
        // re-application to produce the same result, not to be skipped.
        for (product_id, expected_reserved) in &expected {
            let counted = current
                .get(product_id)
                .and_then(|row| row.as_ref())
                .and_then(|row| row.current_quantity);

            let patch = match counted {
                Some(current_quantity) => {
                    let display = (current_quantity - expected_reserved).max(0);
                    StockPatch::derived(display, *expected_reserved)
                }
                None => {
                    // Counted quantity unknown: never fabricate display
                    report.degraded.push(product_id.clone());
                    StockPatch::reserved(*expected_reserved)
                }
            };

            match self.store.upsert_stock(product_id, patch).await {
                Ok(()) => report.updated += 1,
                Err(e) => report.errors.push(SyncError {
                    product_id: product_id.clone(),
                    message: e.to_string(),
                }),
            }
        }

        // 4. Release rows that still carry a reservation with no qualifying
        // order behind it
        for row in &all_rows {
            if expected.contains_key(&row.product_id) || row.reserved_quantity == 0 {
                continue;
            }
            let Some(current_quantity) = row.current_quantity else {
                continue;
            };

            let patch = StockPatch::derived(current_quantity, 0);
            match self.store.upsert_stock(&row.product_id, patch).await {
                Ok(()) => report.released += 1,
                Err(e) => report.errors.push(SyncError {
                    product_id: row.product_id.clone(),
                    message: e.to_string(),
                }),
            }
        }

        report.success = report.errors.is_empty();
        report.duration_ms = started.elapsed().as_millis() as i64;

        if report.success {
            tracing::info!(
                updated = report.updated,
                released = report.released,
                degraded = report.degraded.len(),
                duration_ms = report.duration_ms,
                "Stock sync complete"
            );
        } else {
            tracing::warn!(
                updated = report.updated,
                released = report.released,
                errors = report.errors.len(),
                duration_ms = report.duration_ms,
                "Stock sync finished with per-product errors"
            );
        }

        report
    }
}
