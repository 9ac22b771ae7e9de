//! Order and order item entity models and DTOs.
//!
//! Orders are created exclusively by webhook ingestion (or advanced by
//! admin status transitions), never by direct user input. Items
//! denormalize product and variant names plus prices at time of
//! purchase, deliberately decoupled from live catalog rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rigline_core::types::{Cents, DbId, Timestamp};

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub order_number: String,
    /// `"stripe"` or `"lemonsqueezy"`.
    pub provider: String,
    /// Provider checkout-session identifier, unique per provider.
    pub provider_session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    /// One of the `rigline_core::orders::OrderStatus` strings.
    pub status: String,
    pub total_cents: Cents,
    pub currency: String,
    /// Nullable on purpose: order creation is never blocked by
    /// unresolved product identity.
    pub product_id: Option<DbId>,
    /// Raw provider payload preserved for audit.
    pub provider_payload: serde_json::Value,
    pub created_at: Timestamp,
    pub paid_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_name: String,
    pub variant_name: Option<String>,
    pub unit_price_cents: Cents,
    pub quantity: i32,
    pub created_at: Timestamp,
}

/// An order enriched with its items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Insert payload for a new order (webhook ingestion only).
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_number: String,
    pub provider: String,
    pub provider_session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub status: String,
    pub total_cents: Cents,
    pub currency: String,
    pub product_id: Option<DbId>,
    pub provider_payload: serde_json::Value,
    pub paid_at: Option<Timestamp>,
}

/// Insert payload for the order's single line item.
#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub product_name: String,
    pub variant_name: Option<String>,
    pub unit_price_cents: Cents,
    pub quantity: i32,
}

/// Query parameters for `GET /api/v1/orders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    /// Filter by status string (e.g. `paid`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Body for `PUT /api/v1/orders/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
}
