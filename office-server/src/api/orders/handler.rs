//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, OrderLineItem};
use crate::db::repository::OrderRepository;
use crate::stock::TransitionStockOutcome;
use crate::utils::{AppError, AppResult, ok};
use shared::ApiResponse;
use shared::models::{OrderStatus, OrderStatusUpdate};

const RESOURCE_ORDER: &str = "order";
const RESOURCE_STOCK: &str = "stock";

// =============================================================================
// Query / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// Comma-separated status filter, e.g. `approved,in_transit`
    pub status: Option<String>,
}

/// Order with its line items
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLineItem>,
}

/// Result of a status transition: the stored order plus whatever stock work
/// the transition triggered
#[derive(Debug, Serialize)]
pub struct OrderTransitionResponse {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<TransitionStockOutcome>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/orders - 获取订单列表 (可按状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = match &query.status {
        Some(raw) => {
            let statuses = parse_status_filter(raw)?;
            repo.find_by_status_in(&statuses).await
        }
        None => repo.find_all().await,
    }
    .map_err(|e| AppError::database(e.to_string()))?;

    Ok(ok(orders))
}

/// GET /api/orders/:id - 获取订单详情 (含明细行)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    let items = repo
        .find_line_items(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(ok(OrderDetail { order, items }))
}

/// PUT /api/orders/:id/status - 订单状态流转
///
/// 状态写入先落库，库存工作随后执行；对账失败不回滚状态变更，
/// 报告随响应返回并记录告警，等待下一次对账自愈。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<OrderTransitionResponse>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    let from = order.status;
    let to = payload.status;
    validate_transition(from, to)?;

    // Entering pending_cancellation remembers where the order came from so
    // a declined request can restore it
    let previous = (to == OrderStatus::PendingCancellation).then_some(from);

    let updated = repo
        .update_status(&id, to, previous)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    state.resource_versions.increment(RESOURCE_ORDER);

    let stock = state.stock.handle_transition(&id, from, to).await;
    if stock.is_some() {
        state.resource_versions.increment(RESOURCE_STOCK);
    }

    Ok(ok(OrderTransitionResponse {
        order: updated,
        stock,
    }))
}

/// POST /api/orders/:id/decline-cancellation - 驳回取消申请
///
/// 恢复到申请取消前的状态；若该状态是 approved 等占库状态，
/// 库存会重新预留。
pub async fn decline_cancellation(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderTransitionResponse>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if order.status != OrderStatus::PendingCancellation {
        return Err(AppError::BusinessRule(
            "Order has no pending cancellation request".to_string(),
        ));
    }

    let target = order.previous_status.unwrap_or(OrderStatus::Pending);
    let updated = repo
        .update_status(&id, target, None)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    state.resource_versions.increment(RESOURCE_ORDER);

    let stock = state
        .stock
        .handle_transition(&id, OrderStatus::PendingCancellation, target)
        .await;
    if stock.is_some() {
        state.resource_versions.increment(RESOURCE_STOCK);
    }

    Ok(ok(OrderTransitionResponse {
        order: updated,
        stock,
    }))
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_status_filter(raw: &str) -> AppResult<Vec<OrderStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            OrderStatus::parse(s)
                .ok_or_else(|| AppError::validation(format!("Unknown status: {s}")))
        })
        .collect()
}

/// Legal admin transitions
///
/// `pending_cancellation → previous status` goes through the dedicated
/// decline endpoint, not this table.
fn validate_transition(from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    use OrderStatus::*;

    let allowed = matches!(
        (from, to),
        (Pending, Approved | Cancelled | PendingCancellation)
            | (Approved, InTransit | Cancelled | PendingCancellation)
            | (InTransit, Complete | Cancelled)
            | (Complete, Cancelled)
            | (PendingCancellation, Cancelled)
    );

    if allowed {
        Ok(())
    } else {
        Err(AppError::BusinessRule(format!(
            "Cannot transition order from {} to {}",
            from.as_str(),
            to.as_str()
        )))
    }
}
