//! Stock Model
//!
//! Wire types for the per-product stock projection and the reports
//! produced by the reconciliation engine.

use serde::{Deserialize, Serialize};

/// Per-product stock levels as exposed to the admin shell
///
/// `current_quantity` is the physically counted stock; it is `None` until a
/// count has been recorded. `display_quantity` is derived and stays unset
/// while the counted quantity is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevels {
    pub product_id: String,
    pub current_quantity: Option<i64>,
    pub display_quantity: Option<i64>,
    pub reserved_quantity: i64,
    /// Last reconciliation touch (epoch millis)
    pub last_synced_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Direction of an incremental reservation adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockDirection {
    /// Order became qualifying: earmark its quantities
    Reserve,
    /// Order stopped qualifying: hand the quantities back
    Release,
}

/// A per-product failure inside a stock pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncError {
    pub product_id: String,
    pub message: String,
}

/// Result of a full reconciliation pass
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncReport {
    /// True when the pass ran to completion with an empty error list
    pub success: bool,
    /// Products whose derived quantities were written
    pub updated: usize,
    /// Products reset because no qualifying order references them anymore
    pub released: usize,
    /// Products updated without a known `current_quantity` (informational)
    pub degraded: Vec<String>,
    /// Per-product write failures (the pass continued past each)
    pub errors: Vec<SyncError>,
    /// Pass-fatal failure (ledger/stock read, timeout); nothing partial about it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: i64,
}

impl SyncReport {
    /// Report for a pass that never got to write anything
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Result of an incremental (single-order) adjustment
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdjustmentReport {
    pub success: bool,
    /// Distinct products written
    pub adjusted: usize,
    pub errors: Vec<SyncError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdjustmentReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}
