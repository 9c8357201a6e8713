//! Incremental Stock Adjuster
//!
//! Applies a single order's reservation effect directly to the projection
//! store so the admin shell sees the change immediately. This path is a
//! latency optimization only: concurrent orders touching the same product
//! can race it into drift, and the reconciliation engine is the authority
//! that repairs it.

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{AdjustmentReport, StockDirection, SyncError};

use super::reservation::normalize_product_id;
use super::traits::{OrderLedger, StockPatch, StockStore, StoreError};

pub struct StockAdjuster {
    ledger: Arc<dyn OrderLedger>,
    store: Arc<dyn StockStore>,
}

impl StockAdjuster {
    pub fn new(ledger: Arc<dyn OrderLedger>, store: Arc<dyn StockStore>) -> Self {
        Self { ledger, store }
    }

    /// Apply one order's reservation delta to every product it touches
    ///
    /// Failing to fetch the order's line items aborts the whole adjustment;
    /// a failed write for one product is recorded and the rest continue.
    pub async fn apply_reservation_delta(
        &self,
        order_id: &str,
        direction: StockDirection,
    ) -> AdjustmentReport {
        let items = match self.ledger.line_items_for_order(order_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(order_id, error = %e, "Incremental adjustment aborted");
                return AdjustmentReport::failed(e.to_string());
            }
        };

        // Collapse to one delta per product; an order may list a product on
        // several lines.
        let mut deltas: HashMap<String, i64> = HashMap::new();
        for item in &items {
            if item.quantity <= 0 {
                continue;
            }
            let Some(product_id) = normalize_product_id(&item.product_id) else {
                continue;
            };
            *deltas.entry(product_id).or_insert(0) += item.quantity;
        }

        let mut report = AdjustmentReport {
            success: true,
            ..AdjustmentReport::default()
        };

        for (product_id, quantity) in deltas {
            match self.adjust_product(&product_id, quantity, direction).await {
                Ok(()) => report.adjusted += 1,
                Err(e) => {
                    tracing::warn!(product_id = %product_id, error = %e, "Stock adjustment failed for product");
                    report.errors.push(SyncError {
                        product_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        report.success = report.errors.is_empty();
        tracing::debug!(
            order_id,
            direction = ?direction,
            adjusted = report.adjusted,
            errors = report.errors.len(),
            "Incremental stock adjustment complete"
        );
        report
    }

    async fn adjust_product(
        &self,
        product_id: &str,
        quantity: i64,
        direction: StockDirection,
    ) -> Result<(), StoreError> {
        // Missing rows default both quantities to zero
        let row = self.store.get_stock(product_id).await?.unwrap_or_default();
        let display = row.display_quantity.unwrap_or(0);
        let reserved = row.reserved_quantity;

        let (new_display, new_reserved) = match direction {
            StockDirection::Reserve => ((display - quantity).max(0), reserved + quantity),
            StockDirection::Release => (display + quantity, (reserved - quantity).max(0)),
        };

        self.store
            .upsert_stock(product_id, StockPatch::derived(new_display, new_reserved))
            .await
    }
}
