//! Collaborator seams for the stock subsystem
//!
//! The reconciliation core reads the Order Ledger and reads/writes the
//! Stock Projection Store through these two traits, so the convergence
//! logic can be exercised against in-memory fakes.

use async_trait::async_trait;
use serde::Serialize;
use shared::models::OrderStatus;
use thiserror::Error;

/// Order Ledger read failure — fatal to the pass that hit it
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger read failed: {0}")]
    Read(String),
}

/// Stock Projection Store failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Read failures abort a pass (no baseline, no safe delta)
    #[error("Stock read failed: {0}")]
    Read(String),

    /// Write failures are isolated per product
    #[error("Stock write failed for {product_id}: {message}")]
    Write { product_id: String, message: String },
}

/// An order as seen by the stock subsystem
#[derive(Debug, Clone)]
pub struct LedgerOrder {
    pub id: String,
    pub status: OrderStatus,
}

/// A line item as seen by the stock subsystem
///
/// Values are carried raw; normalization happens in the reservation
/// calculator.
#[derive(Debug, Clone)]
pub struct LedgerLineItem {
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// Stock row snapshot used for delta computation
#[derive(Debug, Clone, Default)]
pub struct StockRow {
    pub product_id: String,
    pub current_quantity: Option<i64>,
    pub display_quantity: Option<i64>,
    pub reserved_quantity: i64,
}

/// Partial stock update
///
/// Absent fields must be left untouched by the store; in particular the
/// reconciliation engine never carries `current_quantity` here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_quantity: Option<i64>,
}

impl StockPatch {
    /// Patch carrying only the reservation total (degraded path: counted
    /// quantity unknown, display left alone)
    pub fn reserved(reserved_quantity: i64) -> Self {
        Self {
            reserved_quantity: Some(reserved_quantity),
            ..Self::default()
        }
    }

    /// Patch carrying both derived quantities
    pub fn derived(display_quantity: i64, reserved_quantity: i64) -> Self {
        Self {
            display_quantity: Some(display_quantity),
            reserved_quantity: Some(reserved_quantity),
            ..Self::default()
        }
    }

    /// Patch recording a physical count plus the re-derived display value
    pub fn counted(current_quantity: i64, display_quantity: i64) -> Self {
        Self {
            current_quantity: Some(current_quantity),
            display_quantity: Some(display_quantity),
            ..Self::default()
        }
    }
}

/// Read access to the authoritative order record
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// All orders whose status is in `statuses`
    async fn list_orders(&self, statuses: &[OrderStatus]) -> Result<Vec<LedgerOrder>, LedgerError>;

    /// Line items belonging to any of `order_ids`
    async fn list_line_items(
        &self,
        order_ids: &[String],
    ) -> Result<Vec<LedgerLineItem>, LedgerError>;

    /// Line items of a single order (incremental path)
    async fn line_items_for_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<LedgerLineItem>, LedgerError>;
}

/// Read/write access to the per-product stock projection
#[async_trait]
pub trait StockStore: Send + Sync {
    async fn get_stock(&self, product_id: &str) -> Result<Option<StockRow>, StoreError>;

    async fn list_all_stock(&self) -> Result<Vec<StockRow>, StoreError>;

    /// Partial upsert; creates the row when missing, never clobbers fields
    /// absent from the patch
    async fn upsert_stock(&self, product_id: &str, patch: StockPatch) -> Result<(), StoreError>;
}
