//! Lumen Office Server - 零售后台管理服务
//!
//! # 架构概述
//!
//! 本模块是后台服务的主入口，提供以下核心功能：
//!
//! - **库存对账** (`stock`): 订单状态流转驱动的库存预留/释放与全量收敛
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储与仓储层
//! - **HTTP API** (`api`): 桌面管理端消费的 RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! office-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── stock/         # 库存对账子系统
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod stock;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, ResourceVersions, Server, ServerState};
pub use crate::db::DbService;
pub use crate::stock::{StockService, StockSyncWorker};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// 初始化运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __
   / /   __  ______ ___  ___  ____
  / /   / / / / __ `__ \/ _ \/ __ \
 / /___/ /_/ / / / / / /  __/ / / /
/_____/\__,_/_/ /_/ /_/\___/_/ /_/
   ____  __________
  / __ \/ __/ __(_)_______
 / / / / /_/ /_/ / ___/ _ \
/ /_/ / __/ __/ / /__/  __/
\____/_/ /_/ /_/\___/\___/
    "#
    );
}
