//! Stock API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{RepoError, StockRepository};
use crate::stock::traits::StockPatch;
use crate::utils::{AppError, AppResult, ok};
use shared::ApiResponse;
use shared::models::{StockLevels, SyncReport};

const RESOURCE_STOCK: &str = "stock";

/// GET /api/stock - 全部库存行
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<StockLevels>>>> {
    let repo = StockRepository::new(state.db.clone());
    let rows = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(ok(rows.into_iter().map(|r| r.into_levels()).collect()))
}

/// GET /api/stock/:product_id - 单个商品库存
pub async fn get_by_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<StockLevels>>> {
    let repo = StockRepository::new(state.db.clone());
    let row = repo
        .find_by_product_id(&product_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Stock for product {}", product_id)))?;

    Ok(ok(row.into_levels()))
}

/// 盘点数量写入载荷
#[derive(Debug, Deserialize, Validate)]
pub struct StockCountPayload {
    #[validate(range(min = 0))]
    pub current_quantity: i64,
}

/// PUT /api/stock/:product_id/quantity - 记录盘点数量
///
/// `current_quantity` 的唯一写入口：盘点/进货在这里落库，
/// 展示数量按已存预留量重新推导。
pub async fn set_counted_quantity(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Json(payload): Json<StockCountPayload>,
) -> AppResult<Json<ApiResponse<StockLevels>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = StockRepository::new(state.db.clone());
    let reserved = repo
        .find_by_product_id(&product_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .map(|r| r.reserved_quantity)
        .unwrap_or(0);
    let display = (payload.current_quantity - reserved).max(0);

    let row = repo
        .upsert(
            &product_id,
            &StockPatch::counted(payload.current_quantity, display),
        )
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::validation(msg),
            other => AppError::database(other.to_string()),
        })?;
    state.resource_versions.increment(RESOURCE_STOCK);

    Ok(ok(row.into_levels()))
}

/// POST /api/stock/resync - 手动触发全量对账
///
/// 任何时刻调用都安全；报告中的失败不会作为 HTTP 错误抛出，
/// 调用方按 `success` 字段决定是否重试。
pub async fn resync(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<SyncReport>>> {
    let report = state.stock.resync().await;
    state.resource_versions.increment(RESOURCE_STOCK);

    if report.success {
        Ok(ok(report))
    } else {
        Ok(Json(ApiResponse::ok_with_message(
            report,
            "Stock may be stale, retry resync",
        )))
    }
}
