//! Shared types for the Lumen back-office
//!
//! Wire models and response structures used by both the office-server
//! and the desktop admin shell.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use models::{OrderStatus, StockDirection};
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
