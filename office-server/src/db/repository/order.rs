//! Order Repository
//!
//! Read access to the order ledger plus the status-transition write path.
//! Order placement itself belongs to the storefront; `create` exists for
//! seeding and tests.

use async_trait::async_trait;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Order, OrderCreate, OrderLineItem};
use crate::stock::traits::{LedgerError, LedgerLineItem, LedgerOrder, OrderLedger};
use shared::models::OrderStatus;
use shared::util::now_millis;

const ORDER_TABLE: &str = "order";
const ORDER_ITEM_TABLE: &str = "order_item";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM `order` ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders whose status is in the given set
    pub async fn find_by_status_in(&self, statuses: &[OrderStatus]) -> RepoResult<Vec<Order>> {
        let status_strings: Vec<String> =
            statuses.iter().map(|s| s.as_str().to_string()).collect();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM `order` WHERE status IN $statuses ORDER BY created_at DESC")
            .bind(("statuses", status_strings))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = record_key(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, key)).await?;
        Ok(order)
    }

    /// Line items of one order
    pub async fn find_line_items(&self, order_id: &str) -> RepoResult<Vec<OrderLineItem>> {
        let key = record_key(ORDER_TABLE, order_id);
        let order_ref = RecordId::from_table_key(ORDER_TABLE, key.to_string());
        let items: Vec<OrderLineItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE `order` = $order")
            .bind(("order", order_ref))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Line items across a set of orders
    pub async fn find_line_items_for(&self, order_ids: &[String]) -> RepoResult<Vec<OrderLineItem>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let order_refs: Vec<RecordId> = order_ids
            .iter()
            .map(|id| RecordId::from_table_key(ORDER_TABLE, record_key(ORDER_TABLE, id).to_string()))
            .collect();
        let items: Vec<OrderLineItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE `order` IN $orders")
            .bind(("orders", order_refs))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create an order with its line items
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let now = now_millis();
        let key = Uuid::new_v4().simple().to_string();
        let order_ref = RecordId::from_table_key(ORDER_TABLE, key.clone());

        let order = Order {
            id: None,
            status: data.status,
            previous_status: None,
            customer_name: data.customer_name,
            total_amount: data.total_amount,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Order> = self
            .base
            .db()
            .create((ORDER_TABLE, key.as_str()))
            .content(order)
            .await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))?;

        for item in data.items {
            let line_item = OrderLineItem {
                id: None,
                order: order_ref.clone(),
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            };
            let _: Option<OrderLineItem> = self
                .base
                .db()
                .create(ORDER_ITEM_TABLE)
                .content(line_item)
                .await?;
        }

        Ok(created)
    }

    /// Persist a status transition
    ///
    /// `previous_status` is recorded when entering `pending_cancellation`
    /// and cleared (bound as NONE) otherwise.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        previous_status: Option<OrderStatus>,
    ) -> RepoResult<Order> {
        let key = record_key(ORDER_TABLE, id);
        let record = RecordId::from_table_key(ORDER_TABLE, key.to_string());
        let previous: Option<String> = previous_status.map(|s| s.as_str().to_string());

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET status = $status, previous_status = $previous, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("order", record))
            .bind(("status", status.as_str().to_string()))
            .bind(("previous", previous))
            .bind(("now", now_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;

        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}

// =============================================================================
// OrderLedger seam
// =============================================================================

#[async_trait]
impl OrderLedger for OrderRepository {
    async fn list_orders(&self, statuses: &[OrderStatus]) -> Result<Vec<LedgerOrder>, LedgerError> {
        let orders = self
            .find_by_status_in(statuses)
            .await
            .map_err(|e| LedgerError::Read(e.to_string()))?;
        Ok(orders
            .into_iter()
            .map(|o| LedgerOrder {
                id: o.id_string(),
                status: o.status,
            })
            .collect())
    }

    async fn list_line_items(
        &self,
        order_ids: &[String],
    ) -> Result<Vec<LedgerLineItem>, LedgerError> {
        let items = self
            .find_line_items_for(order_ids)
            .await
            .map_err(|e| LedgerError::Read(e.to_string()))?;
        Ok(items.into_iter().map(to_ledger_item).collect())
    }

    async fn line_items_for_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<LedgerLineItem>, LedgerError> {
        let items = self
            .find_line_items(order_id)
            .await
            .map_err(|e| LedgerError::Read(e.to_string()))?;
        Ok(items.into_iter().map(to_ledger_item).collect())
    }
}

fn to_ledger_item(item: OrderLineItem) -> LedgerLineItem {
    LedgerLineItem {
        order_id: item.order.to_string(),
        product_id: item.product_id,
        quantity: item.quantity,
    }
}
