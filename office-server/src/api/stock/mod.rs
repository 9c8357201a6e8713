//! Stock API Module
//!
//! Stock rows as the admin shell sees them, the physical-count write path,
//! and the manual resync action.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Stock router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/resync", post(handler::resync))
        .route("/{product_id}", get(handler::get_by_product))
        .route("/{product_id}/quantity", put(handler::set_counted_quantity))
}
