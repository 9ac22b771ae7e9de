//! Webhook order ingestion.
//!
//! Maps normalized payment events onto order rows, idempotently keyed
//! by the provider's checkout-session identifier. Product identity is
//! resolved best-effort; an order is always created even when no
//! product can be matched. The order and its single line item are
//! written in one transaction.

use sqlx::PgPool;

use rigline_core::matching::names_match;
use rigline_core::orders::{generate_order_number, OrderStatus};
use rigline_core::types::DbId;
use rigline_db::models::order::{CreateOrder, CreateOrderItem};
use rigline_db::models::product::Product;
use rigline_db::repositories::{OrderRepo, ProductRepo, VariantRepo};

use crate::webhook::{CheckoutEvent, PaymentEvent, Provider};

/// What an ingested event did.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// A new order (and its line item) was created.
    Created { order_id: DbId, order_number: String },
    /// The session was seen before and promoted to paid.
    MarkedPaid { order_id: DbId },
    /// The session was seen before and already paid; no-op.
    AlreadyPaid { order_id: DbId },
    /// A refund was applied.
    Refunded { order_id: DbId },
    /// A refund or payment confirmation referenced an unknown order.
    OrderNotFound,
    /// The event kind is not processed.
    Ignored { kind: String },
}

/// Process one normalized provider event.
pub async fn ingest(
    pool: &PgPool,
    provider: Provider,
    event: PaymentEvent,
    raw_payload: serde_json::Value,
) -> Result<IngestOutcome, sqlx::Error> {
    match event {
        PaymentEvent::CheckoutCompleted(checkout) => {
            ingest_checkout(pool, provider, checkout, raw_payload).await
        }
        PaymentEvent::PaymentSucceeded { payment_intent_id } => {
            mark_paid_by_intent(pool, provider, &payment_intent_id).await
        }
        PaymentEvent::ChargeRefunded { payment_intent_id } => {
            refund_by_intent(pool, provider, &payment_intent_id).await
        }
        PaymentEvent::Ignored { kind } => Ok(IngestOutcome::Ignored { kind }),
    }
}

/// Idempotent checkout ingestion keyed on the provider session id.
async fn ingest_checkout(
    pool: &PgPool,
    provider: Provider,
    checkout: CheckoutEvent,
    raw_payload: serde_json::Value,
) -> Result<IngestOutcome, sqlx::Error> {
    if let Some(existing) =
        OrderRepo::find_by_provider_session(pool, provider.as_str(), &checkout.session_id).await?
    {
        if existing.status == OrderStatus::Paid.as_str() {
            return Ok(IngestOutcome::AlreadyPaid {
                order_id: existing.id,
            });
        }
        let now = chrono::Utc::now();
        OrderRepo::update_status(pool, existing.id, OrderStatus::Paid.as_str(), now).await?;
        tracing::info!(order_id = existing.id, "Duplicate checkout delivery; marked paid");
        return Ok(IngestOutcome::MarkedPaid {
            order_id: existing.id,
        });
    }

    let products = ProductRepo::list(pool).await?;
    let product = resolve_product(&products, &checkout);

    let variant_name = match checkout.variant_id {
        Some(variant_id) => VariantRepo::find_by_id(pool, variant_id)
            .await?
            .map(|v| v.model_number),
        None => None,
    }
    .or_else(|| synthesize_variant_name(&checkout));

    let product_name = product
        .map(|p| p.title.clone())
        .or_else(|| checkout.description.clone())
        .unwrap_or_else(|| "Unknown product".to_string());

    let now = chrono::Utc::now();
    let quantity = checkout.quantity.max(1);

    let order = CreateOrder {
        order_number: generate_order_number(now),
        provider: provider.as_str().to_string(),
        provider_session_id: checkout.session_id.clone(),
        payment_intent_id: checkout.payment_intent_id.clone(),
        customer_name: checkout.customer_name.clone(),
        customer_email: checkout.customer_email.clone(),
        status: OrderStatus::Paid.as_str().to_string(),
        total_cents: checkout.total_cents,
        currency: checkout.currency.clone(),
        product_id: product.map(|p| p.id),
        provider_payload: raw_payload,
        paid_at: Some(now),
    };
    let item = CreateOrderItem {
        product_name,
        variant_name,
        unit_price_cents: checkout.total_cents / i64::from(quantity),
        quantity,
    };

    let created = OrderRepo::create_with_item(pool, &order, &item).await?;
    tracing::info!(
        order_id = created.order.id,
        order_number = %created.order.order_number,
        provider = provider.as_str(),
        product_resolved = product.is_some(),
        "Order created from webhook"
    );

    Ok(IngestOutcome::Created {
        order_id: created.order.id,
        order_number: created.order.order_number,
    })
}

/// Promote an existing order to paid when the provider confirms the
/// payment separately from checkout completion.
async fn mark_paid_by_intent(
    pool: &PgPool,
    provider: Provider,
    payment_intent_id: &str,
) -> Result<IngestOutcome, sqlx::Error> {
    let Some(order) =
        OrderRepo::find_by_payment_intent(pool, provider.as_str(), payment_intent_id).await?
    else {
        return Ok(IngestOutcome::OrderNotFound);
    };

    if order.status == OrderStatus::Paid.as_str() {
        return Ok(IngestOutcome::AlreadyPaid { order_id: order.id });
    }

    let now = chrono::Utc::now();
    OrderRepo::update_status(pool, order.id, OrderStatus::Paid.as_str(), now).await?;
    Ok(IngestOutcome::MarkedPaid { order_id: order.id })
}

/// Transition an order to refunded, unconditionally.
///
/// This path deliberately bypasses the admin terminal-status rule: a
/// delivered order can be force-refunded by the provider. The
/// inconsistency with the admin transition table is documented, not
/// silently fixed.
async fn refund_by_intent(
    pool: &PgPool,
    provider: Provider,
    payment_intent_id: &str,
) -> Result<IngestOutcome, sqlx::Error> {
    let Some(order) =
        OrderRepo::find_by_payment_intent(pool, provider.as_str(), payment_intent_id).await?
    else {
        return Ok(IngestOutcome::OrderNotFound);
    };

    let now = chrono::Utc::now();
    OrderRepo::update_status(pool, order.id, OrderStatus::Refunded.as_str(), now).await?;
    tracing::info!(order_id = order.id, "Order refunded via webhook");
    Ok(IngestOutcome::Refunded { order_id: order.id })
}

// ---------------------------------------------------------------------------
// Resolution heuristics
// ---------------------------------------------------------------------------

/// Resolve the purchased product. First success wins:
/// 1. explicit product slug in event metadata;
/// 2. the event's payment-link identifier against stored payment links;
/// 3. fuzzy match of the line-item description against titles.
///
/// `None` never blocks order creation.
fn resolve_product<'a>(products: &'a [Product], checkout: &CheckoutEvent) -> Option<&'a Product> {
    if let Some(slug) = &checkout.product_slug {
        if let Some(product) = products.iter().find(|p| p.slug == *slug) {
            return Some(product);
        }
    }

    if let Some(link) = &checkout.payment_link {
        let needle = link.to_lowercase();
        if let Some(product) = products.iter().find(|p| {
            p.payment_link_url
                .as_deref()
                .is_some_and(|url| url.to_lowercase().contains(&needle))
        }) {
            return Some(product);
        }
    }

    if let Some(description) = &checkout.description {
        if let Some(product) = products
            .iter()
            .find(|p| names_match(description, &p.title))
        {
            return Some(product);
        }
    }

    None
}

/// Synthesize a variant display name from metadata attribute fields,
/// joined by commas: `"10 tons, 6 ft, hook"`.
fn synthesize_variant_name(checkout: &CheckoutEvent) -> Option<String> {
    let parts: Vec<&str> = [
        checkout.capacity.as_deref(),
        checkout.length.as_deref(),
        checkout.end_connection.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
