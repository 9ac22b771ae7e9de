//! Handlers for the `/orders` resource.
//!
//! Orders are created by webhook ingestion only; this surface is
//! read + status transitions. The admin status path enforces the
//! transition table; terminal statuses reject every further move.

use axum::extract::{Path, Query, State};
use axum::Json;

use rigline_core::error::CoreError;
use rigline_core::orders::{validate_transition, OrderStatus};
use rigline_core::types::DbId;
use rigline_db::models::order::{Order, OrderListQuery, OrderWithItems, UpdateOrderStatus};
use rigline_db::repositories::OrderRepo;

use crate::auth::middleware::AuthAdmin;
use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/orders
///
/// Newest first; optional `status` filter, `limit`/`offset` paging.
pub async fn list(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    if let Some(status) = &query.status {
        // Reject typos up front instead of returning an empty list.
        OrderStatus::parse(status)?;
    }
    let orders = OrderRepo::list(&state.pool, &query).await?;
    Ok(Json(orders))
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<OrderWithItems>> {
    let order = OrderRepo::find_by_id_with_items(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;
    Ok(Json(order))
}

/// PUT /api/v1/orders/{id}/status
///
/// Validated by the order state machine: only the documented forward
/// moves are allowed, and terminal statuses (`delivered`, `refunded`,
/// `failed`) reject everything with 409. Setting the current status
/// again is a no-op.
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<Json<Order>> {
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    let current = OrderStatus::parse(&order.status)?;
    let requested = OrderStatus::parse(&input.status)?;

    if current == requested {
        return Ok(Json(order));
    }
    validate_transition(current, requested)?;

    let now = chrono::Utc::now();
    let updated = OrderRepo::update_status(&state.pool, id, requested.as_str(), now)
        .await?
        .ok_or(CoreError::NotFound { entity: "Order", id })?;

    tracing::info!(
        order_id = id,
        from = current.as_str(),
        to = requested.as_str(),
        "Order status updated"
    );
    Ok(Json(updated))
}
