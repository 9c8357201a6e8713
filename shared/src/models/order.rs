//! Order Model

use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// `pending_cancellation` is a reversible intermediate state: the order can
/// progress to `cancelled` or be restored to the status it held before the
/// cancellation request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    InTransit,
    Complete,
    Cancelled,
    PendingCancellation,
}

impl OrderStatus {
    /// Statuses whose orders hold stock in reserve
    pub const QUALIFYING: [OrderStatus; 3] = [
        OrderStatus::Approved,
        OrderStatus::InTransit,
        OrderStatus::Complete,
    ];

    /// Whether an order in this status reserves stock
    pub fn is_qualifying(self) -> bool {
        matches!(
            self,
            OrderStatus::Approved | OrderStatus::InTransit | OrderStatus::Complete
        )
    }

    /// Canonical snake_case string form (matches the serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Complete => "complete",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::PendingCancellation => "pending_cancellation",
        }
    }

    /// Parse from the canonical string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "approved" => Some(OrderStatus::Approved),
            "in_transit" => Some(OrderStatus::InTransit),
            "complete" => Some(OrderStatus::Complete),
            "cancelled" => Some(OrderStatus::Cancelled),
            "pending_cancellation" => Some(OrderStatus::PendingCancellation),
            _ => None,
        }
    }
}

/// Update status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifying_set_matches_predicate() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Approved,
            OrderStatus::InTransit,
            OrderStatus::Complete,
            OrderStatus::Cancelled,
            OrderStatus::PendingCancellation,
        ] {
            assert_eq!(
                status.is_qualifying(),
                OrderStatus::QUALIFYING.contains(&status)
            );
        }
    }

    #[test]
    fn status_string_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Approved,
            OrderStatus::InTransit,
            OrderStatus::Complete,
            OrderStatus::Cancelled,
            OrderStatus::PendingCancellation,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        let back: OrderStatus = serde_json::from_str("\"pending_cancellation\"").unwrap();
        assert_eq!(back, OrderStatus::PendingCancellation);
    }
}
