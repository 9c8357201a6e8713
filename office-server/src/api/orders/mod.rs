//! Order API Module
//!
//! Listing, detail, and the status transitions that drive stock
//! reconciliation. Order placement lives in the storefront, not here.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route(
            "/{id}/decline-cancellation",
            post(handler::decline_cancellation),
        )
}
