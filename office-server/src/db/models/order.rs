//! Order Row Models

use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;
use surrealdb::RecordId;

use super::serde_helpers;

/// Order entity (Order Ledger row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub status: OrderStatus,
    /// Status held before entering `pending_cancellation`; consumed by the
    /// decline-cancellation path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<OrderStatus>,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Total amount in currency units
    #[serde(default)]
    pub total_amount: f64,
    /// Epoch millis
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Record id in "order:key" string form (empty for unsaved rows)
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Order line item entity
///
/// Belongs to exactly one order; immutable once created. Upstream rows mix
/// numeric and string product ids and occasionally carry malformed
/// quantities; both are coerced on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Owning order
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(deserialize_with = "serde_helpers::lenient_string")]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    /// Non-numeric values read as 0 (zero contribution)
    #[serde(deserialize_with = "serde_helpers::lenient_quantity")]
    pub quantity: i64,
    /// Unit price in currency units
    #[serde(default)]
    pub unit_price: f64,
}

/// Create order payload (seeding and tests; order placement itself lives in
/// the storefront)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub items: Vec<OrderLineItemCreate>,
}

/// Line item payload for [`OrderCreate`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItemCreate {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
}
