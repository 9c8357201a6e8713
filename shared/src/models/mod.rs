//! Data models
//!
//! Shared between office-server and the desktop shell (via API).

pub mod order;
pub mod stock;

// Re-exports
pub use order::*;
pub use stock::*;
