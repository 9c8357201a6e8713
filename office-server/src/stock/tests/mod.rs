//! Scenario tests for the stock subsystem
//!
//! All tests run against in-memory fakes of the order ledger and the stock
//! store; the store fake can inject per-product write failures and hanging
//! writes.

mod test_adjuster;
mod test_service;

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use shared::models::OrderStatus;

use super::traits::{
    LedgerError, LedgerLineItem, LedgerOrder, OrderLedger, StockPatch, StockRow, StockStore,
    StoreError,
};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
pub struct MemoryLedger {
    orders: Mutex<Vec<LedgerOrder>>,
    items: Mutex<Vec<LedgerLineItem>>,
    fail_reads: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_order(&self, id: &str, status: OrderStatus) {
        self.orders.lock().unwrap().push(LedgerOrder {
            id: id.to_string(),
            status,
        });
    }

    pub fn set_status(&self, id: &str, status: OrderStatus) {
        let mut orders = self.orders.lock().unwrap();
        for order in orders.iter_mut() {
            if order.id == id {
                order.status = status;
            }
        }
    }

    pub fn push_item(&self, order_id: &str, product_id: &str, quantity: i64) {
        self.items.lock().unwrap().push(LedgerLineItem {
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
        });
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderLedger for MemoryLedger {
    async fn list_orders(&self, statuses: &[OrderStatus]) -> Result<Vec<LedgerOrder>, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Read("ledger unavailable".to_string()));
        }
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| statuses.contains(&o.status))
            .cloned()
            .collect())
    }

    async fn list_line_items(
        &self,
        order_ids: &[String],
    ) -> Result<Vec<LedgerLineItem>, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Read("ledger unavailable".to_string()));
        }
        let wanted: HashSet<&str> = order_ids.iter().map(|s| s.as_str()).collect();
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| wanted.contains(i.order_id.as_str()))
            .cloned()
            .collect())
    }

    async fn line_items_for_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<LedgerLineItem>, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Read("ledger unavailable".to_string()));
        }
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, StockRow>>,
    fail_writes_for: Mutex<HashSet<String>>,
    fail_reads: AtomicBool,
    hang_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(
        &self,
        product_id: &str,
        current: Option<i64>,
        display: Option<i64>,
        reserved: i64,
    ) {
        self.rows.lock().unwrap().insert(
            product_id.to_string(),
            StockRow {
                product_id: product_id.to_string(),
                current_quantity: current,
                display_quantity: display,
                reserved_quantity: reserved,
            },
        );
    }

    pub fn fail_writes_for(&self, product_id: &str) {
        self.fail_writes_for
            .lock()
            .unwrap()
            .insert(product_id.to_string());
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn hang_writes(&self) {
        self.hang_writes.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self, product_id: &str) -> Option<StockRow> {
        self.rows.lock().unwrap().get(product_id).cloned()
    }

    /// All rows, keyed by product id, for whole-store comparisons
    pub fn dump(&self) -> HashMap<String, (Option<i64>, Option<i64>, i64)> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    (v.current_quantity, v.display_quantity, v.reserved_quantity),
                )
            })
            .collect()
    }
}

#[async_trait]
impl StockStore for MemoryStore {
    async fn get_stock(&self, product_id: &str) -> Result<Option<StockRow>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read("stock store unavailable".to_string()));
        }
        Ok(self.rows.lock().unwrap().get(product_id).cloned())
    }

    async fn list_all_stock(&self) -> Result<Vec<StockRow>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read("stock store unavailable".to_string()));
        }
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn upsert_stock(&self, product_id: &str, patch: StockPatch) -> Result<(), StoreError> {
        if self.hang_writes.load(Ordering::SeqCst) {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        }
        if self.fail_writes_for.lock().unwrap().contains(product_id) {
            return Err(StoreError::Write {
                product_id: product_id.to_string(),
                message: "write rejected".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .entry(product_id.to_string())
            .or_insert_with(|| StockRow {
                product_id: product_id.to_string(),
                ..StockRow::default()
            });
        if let Some(current) = patch.current_quantity {
            row.current_quantity = Some(current);
        }
        if let Some(display) = patch.display_quantity {
            row.display_quantity = Some(display);
        }
        if let Some(reserved) = patch.reserved_quantity {
            row.reserved_quantity = reserved;
        }
        Ok(())
    }
}
