//! Repository for the `orders` and `order_items` tables.

use sqlx::PgPool;

use rigline_core::types::{DbId, Timestamp};

use crate::models::order::{
    CreateOrder, CreateOrderItem, Order, OrderItem, OrderListQuery, OrderWithItems,
};

/// Column list for the `orders` table.
const COLUMNS: &str = "id, order_number, provider, provider_session_id, payment_intent_id, \
    customer_name, customer_email, status, total_cents, currency, product_id, \
    provider_payload, created_at, paid_at, delivered_at, updated_at";

/// Column list for the `order_items` table.
const ITEM_COLUMNS: &str =
    "id, order_id, product_name, variant_name, unit_price_cents, quantity, created_at";

/// Default page size for order listings.
const DEFAULT_LIMIT: i64 = 50;
/// Hard cap on requested page size.
const MAX_LIMIT: i64 = 100;

/// Provides read, creation, and status operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order together with its single line item, atomically.
    ///
    /// Webhook ingestion is the only caller; the one-transaction
    /// boundary guarantees no order ever exists without its item.
    pub async fn create_with_item(
        pool: &PgPool,
        order: &CreateOrder,
        item: &CreateOrderItem,
    ) -> Result<OrderWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_order = format!(
            "INSERT INTO orders \
                (order_number, provider, provider_session_id, payment_intent_id, \
                 customer_name, customer_email, status, total_cents, currency, \
                 product_id, provider_payload, paid_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        let order_row = sqlx::query_as::<_, Order>(&insert_order)
            .bind(&order.order_number)
            .bind(&order.provider)
            .bind(&order.provider_session_id)
            .bind(&order.payment_intent_id)
            .bind(&order.customer_name)
            .bind(&order.customer_email)
            .bind(&order.status)
            .bind(order.total_cents)
            .bind(&order.currency)
            .bind(order.product_id)
            .bind(&order.provider_payload)
            .bind(order.paid_at)
            .fetch_one(&mut *tx)
            .await?;

        let insert_item = format!(
            "INSERT INTO order_items \
                (order_id, product_name, variant_name, unit_price_cents, quantity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ITEM_COLUMNS}"
        );
        let item_row = sqlx::query_as::<_, OrderItem>(&insert_item)
            .bind(order_row.id)
            .bind(&item.product_name)
            .bind(&item.variant_name)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OrderWithItems {
            order: order_row,
            items: vec![item_row],
        })
    }

    /// Find an order by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an order by ID, enriched with its items.
    pub async fn find_by_id_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrderWithItems>, sqlx::Error> {
        let order = Self::find_by_id(pool, id).await?;
        match order {
            Some(order) => {
                let items = Self::items_for_order(pool, order.id).await?;
                Ok(Some(OrderWithItems { order, items }))
            }
            None => Ok(None),
        }
    }

    /// Find the order created for a provider checkout session, if any.
    /// This is the webhook idempotency key.
    pub async fn find_by_provider_session(
        pool: &PgPool,
        provider: &str,
        session_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders \
             WHERE provider = $1 AND provider_session_id = $2"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(provider)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an order by the provider's payment-intent identifier
    /// (refund events reference this rather than the session).
    pub async fn find_by_payment_intent(
        pool: &PgPool,
        provider: &str,
        payment_intent_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders \
             WHERE provider = $1 AND payment_intent_id = $2"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(provider)
            .bind(payment_intent_id)
            .fetch_optional(pool)
            .await
    }

    /// List orders, newest first, optionally filtered by status.
    pub async fn list(pool: &PgPool, query: &OrderListQuery) -> Result<Vec<Order>, sqlx::Error> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = query.offset.unwrap_or(0).max(0);

        match &query.status {
            Some(status) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM orders WHERE status = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Order>(&sql)
                    .bind(status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM orders \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Order>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Set an order's status, stamping `paid_at`/`delivered_at` when
    /// the new status first reaches those states.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        now: Timestamp,
    ) -> Result<Option<Order>, sqlx::Error> {
        let update_query = format!(
            "UPDATE orders SET \
                status = $2, \
                paid_at = CASE WHEN $2 = 'paid' AND paid_at IS NULL THEN $3 ELSE paid_at END, \
                delivered_at = CASE WHEN $2 = 'delivered' AND delivered_at IS NULL \
                    THEN $3 ELSE delivered_at END, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&update_query)
            .bind(id)
            .bind(status)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn items_for_order(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }
}
