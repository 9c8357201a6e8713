//! Product Stock Row Model

use serde::{Deserialize, Serialize};
use shared::models::StockLevels;
use surrealdb::RecordId;

use super::serde_helpers;

/// Product stock row (Stock Projection Store)
///
/// `current_quantity` is the physically counted stock and stays `None`
/// until a count has been recorded; derived fields never fabricate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStock {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(deserialize_with = "serde_helpers::lenient_string")]
    pub product_id: String,
    #[serde(default)]
    pub current_quantity: Option<i64>,
    #[serde(default)]
    pub display_quantity: Option<i64>,
    #[serde(default)]
    pub reserved_quantity: i64,
    /// Last reconciliation touch (epoch millis)
    #[serde(default)]
    pub last_synced_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl ProductStock {
    /// Wire representation for the admin shell
    pub fn into_levels(self) -> StockLevels {
        StockLevels {
            product_id: self.product_id,
            current_quantity: self.current_quantity,
            display_quantity: self.display_quantity,
            reserved_quantity: self.reserved_quantity,
            last_synced_at: self.last_synced_at,
            updated_at: self.updated_at,
        }
    }
}
