//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单管理接口 (状态流转驱动库存对账)
//! - [`stock`] - 库存接口 (盘点写入、手动对账)
//! - [`dashboard`] - 仪表盘统计

pub mod dashboard;
pub mod health;
pub mod orders;
pub mod stock;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
