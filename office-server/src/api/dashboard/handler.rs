//! Dashboard API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::utils::time::Period;
use crate::utils::{AppError, AppResult, ok};
use shared::ApiResponse;
use shared::models::OrderStatus;

// ============================================================================
// Response Types
// ============================================================================

/// Order counts per status
#[derive(Debug, Clone, Serialize, Default)]
pub struct OrderCounts {
    pub pending: i64,
    pub approved: i64,
    pub in_transit: i64,
    pub complete: i64,
    pub cancelled: i64,
    pub pending_cancellation: i64,
    pub total: i64,
}

/// Earnings summary (completed orders only)
#[derive(Debug, Clone, Serialize)]
pub struct EarningsStats {
    pub total: f64,
    pub period: f64,
    pub growth_pct: f64,
}

/// Full dashboard statistics response
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub orders: OrderCounts,
    pub earnings: EarningsStats,
    pub period: &'static str,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// week | month | year (default month)
    pub period: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/dashboard/stats - 仪表盘统计
pub async fn stats(
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let period = Period::parse(query.period.as_deref());
    let window_start = period.start_millis(Utc::now());

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let mut counts = OrderCounts::default();
    let mut total_earnings = 0.0;
    let mut period_earnings = 0.0;

    for order in &orders {
        counts.total += 1;
        match order.status {
            OrderStatus::Pending => counts.pending += 1,
            OrderStatus::Approved => counts.approved += 1,
            OrderStatus::InTransit => counts.in_transit += 1,
            OrderStatus::Complete => counts.complete += 1,
            OrderStatus::Cancelled => counts.cancelled += 1,
            OrderStatus::PendingCancellation => counts.pending_cancellation += 1,
        }

        if order.status == OrderStatus::Complete {
            total_earnings += order.total_amount;
            if order.created_at >= window_start {
                period_earnings += order.total_amount;
            }
        }
    }

    // 增长率以窗口外的累计额为基数
    let previous = total_earnings - period_earnings;
    let growth_pct = if previous > 0.0 {
        (period_earnings - previous) / previous * 100.0
    } else {
        0.0
    };

    Ok(ok(DashboardStats {
        orders: counts,
        earnings: EarningsStats {
            total: total_earnings,
            period: period_earnings,
            growth_pct,
        },
        period: period.as_str(),
    }))
}
