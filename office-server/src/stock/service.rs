//! Stock service — the invocation surface of the stock subsystem
//!
//! Order-transition handlers and the manual resync action both come through
//! here. A transition that moves an order across the qualifying boundary
//! first runs the incremental adjuster for immediate feedback, then the
//! authoritative reconciliation pass; transitions that stay on one side of
//! the boundary need no stock work at all.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::models::{AdjustmentReport, OrderStatus, StockDirection, SyncReport};

use super::adjuster::StockAdjuster;
use super::reconciler::StockReconciler;
use super::traits::{OrderLedger, StockStore};

/// Stock effect of a status transition
///
/// `Reserve` when the order enters the qualifying set, `Release` when it
/// leaves it, `None` for moves on one side of the boundary (including
/// approved→in_transit→complete, which keep the reservation unchanged).
pub fn reservation_effect(from: OrderStatus, to: OrderStatus) -> Option<StockDirection> {
    match (from.is_qualifying(), to.is_qualifying()) {
        (false, true) => Some(StockDirection::Reserve),
        (true, false) => Some(StockDirection::Release),
        _ => None,
    }
}

/// Stock work performed as the side effect of one status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStockOutcome {
    pub direction: StockDirection,
    pub adjustment: AdjustmentReport,
    pub sync: SyncReport,
}

pub struct StockService {
    adjuster: StockAdjuster,
    reconciler: StockReconciler,
    sync_timeout: Duration,
}

impl StockService {
    pub fn new(
        ledger: Arc<dyn OrderLedger>,
        store: Arc<dyn StockStore>,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            adjuster: StockAdjuster::new(ledger.clone(), store.clone()),
            reconciler: StockReconciler::new(ledger, store),
            sync_timeout,
        }
    }

    /// Dispatch stock work for a committed status transition
    ///
    /// Returns `None` when the transition does not cross the qualifying
    /// boundary. A failed report never rolls the status change back; the
    /// caller surfaces it to the operator and the store heals on the next
    /// pass.
    pub async fn handle_transition(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Option<TransitionStockOutcome> {
        let direction = reservation_effect(from, to)?;

        let adjustment = self
            .adjuster
            .apply_reservation_delta(order_id, direction)
            .await;
        if !adjustment.success {
            tracing::warn!(
                order_id,
                direction = ?direction,
                "Incremental adjustment incomplete; reconciliation will correct"
            );
        }

        let sync = self.resync().await;
        if !sync.success {
            tracing::warn!(
                order_id,
                "Stock reconciliation failed after status change; stock may be stale until resync"
            );
        }

        Some(TransitionStockOutcome {
            direction,
            adjustment,
            sync,
        })
    }

    /// Timeout-bounded authoritative pass; safe to call at any time, any
    /// number of times
    pub async fn resync(&self) -> SyncReport {
        match tokio::time::timeout(self.sync_timeout, self.reconciler.sync_all()).await {
            Ok(report) => report,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.sync_timeout.as_millis() as u64,
                    "Stock reconciliation timed out"
                );
                SyncReport::failed(
                    "Reconciliation timed out; store may be partially updated, retry resync",
                )
            }
        }
    }
}
