//! Route definitions for orders.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// GET /              -> list
/// GET /{id}          -> get_by_id (with items)
/// PUT /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(order::list))
        .route("/{id}", get(order::get_by_id))
        .route("/{id}/status", put(order::update_status))
}
