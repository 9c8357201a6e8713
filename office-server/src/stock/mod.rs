//! Stock reconciliation subsystem
//!
//! Keeps the per-product stock projection (`display_quantity`,
//! `reserved_quantity`) consistent with the order ledger under concurrent
//! admin actions. Two strategies behind one surface:
//!
//! - [`StockAdjuster`] — best-effort single-order delta for immediate UI
//!   feedback; allowed to drift under races.
//! - [`StockReconciler`] — authoritative full recomputation; idempotent,
//!   convergent, always wins.
//!
//! [`StockService`] is the entry point: it maps order status transitions to
//! stock work and exposes the manual resync action.

pub mod adjuster;
pub mod reconciler;
pub mod reservation;
pub mod service;
pub mod traits;
pub mod worker;

#[cfg(test)]
mod tests;

// Re-exports
pub use adjuster::StockAdjuster;
pub use reconciler::StockReconciler;
pub use service::{StockService, TransitionStockOutcome, reservation_effect};
pub use traits::{OrderLedger, StockStore};
pub use worker::StockSyncWorker;
