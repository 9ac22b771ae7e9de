//! Integration tests for order creation and listing.

use sqlx::PgPool;

use rigline_db::models::order::{CreateOrder, CreateOrderItem, OrderListQuery};
use rigline_db::repositories::OrderRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_order(session: &str, status: &str) -> CreateOrder {
    CreateOrder {
        order_number: format!("ORD-20260101000000-{session}"),
        provider: "stripe".to_string(),
        provider_session_id: session.to_string(),
        payment_intent_id: Some(format!("pi_{session}")),
        customer_name: Some("Ada".to_string()),
        customer_email: Some("ada@example.com".to_string()),
        status: status.to_string(),
        total_cents: 50_000,
        currency: "usd".to_string(),
        product_id: None,
        provider_payload: serde_json::json!({ "id": session }),
        paid_at: None,
    }
}

fn new_item() -> CreateOrderItem {
    CreateOrderItem {
        product_name: "Heavy Duty Spreader Bar".to_string(),
        variant_name: Some("HEA-10tons-6ft".to_string()),
        unit_price_cents: 50_000,
        quantity: 1,
    }
}

// ---------------------------------------------------------------------------
// Test: atomic order + item creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_and_item_are_created_together(pool: PgPool) {
    let created = OrderRepo::create_with_item(&pool, &new_order("cs_1", "paid"), &new_item())
        .await
        .unwrap();

    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].order_id, created.order.id);
    // Denormalized names survive independent of catalog state.
    assert_eq!(created.items[0].product_name, "Heavy Duty Spreader Bar");

    let reloaded = OrderRepo::find_by_id_with_items(&pool, created.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.items.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_session_is_unique_per_provider(pool: PgPool) {
    OrderRepo::create_with_item(&pool, &new_order("cs_1", "paid"), &new_item())
        .await
        .unwrap();

    let mut duplicate = new_order("cs_1", "paid");
    duplicate.order_number = "ORD-20260101000001-XXXX".to_string();
    let err = OrderRepo::create_with_item(&pool, &duplicate, &new_item())
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_orders_provider_session"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lookup_by_session_and_payment_intent(pool: PgPool) {
    let created = OrderRepo::create_with_item(&pool, &new_order("cs_1", "paid"), &new_item())
        .await
        .unwrap();

    let by_session = OrderRepo::find_by_provider_session(&pool, "stripe", "cs_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_session.id, created.order.id);

    let by_intent = OrderRepo::find_by_payment_intent(&pool, "stripe", "pi_cs_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_intent.id, created.order.id);

    // Provider scoping: the same session id under another provider is
    // a different order space.
    assert!(OrderRepo::find_by_provider_session(&pool, "lemonsqueezy", "cs_1")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: status updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_update_stamps_paid_and_delivered_once(pool: PgPool) {
    let created = OrderRepo::create_with_item(&pool, &new_order("cs_1", "pending"), &new_item())
        .await
        .unwrap();
    assert!(created.order.paid_at.is_none());

    let now = chrono::Utc::now();
    let paid = OrderRepo::update_status(&pool, created.order.id, "paid", now)
        .await
        .unwrap()
        .unwrap();
    let paid_at = paid.paid_at.expect("paid_at stamped");

    let later = chrono::Utc::now();
    let delivered = OrderRepo::update_status(&pool, created.order.id, "delivered", later)
        .await
        .unwrap()
        .unwrap();
    assert!(delivered.delivered_at.is_some());
    // The original paid stamp is not overwritten.
    assert_eq!(delivered.paid_at, Some(paid_at));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_filters_by_status_newest_first(pool: PgPool) {
    for (session, status) in [("cs_1", "paid"), ("cs_2", "pending"), ("cs_3", "paid")] {
        OrderRepo::create_with_item(&pool, &new_order(session, status), &new_item())
            .await
            .unwrap();
    }

    let all = OrderRepo::list(&pool, &OrderListQuery::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let paid = OrderRepo::list(
        &pool,
        &OrderListQuery {
            status: Some("paid".to_string()),
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(paid.len(), 2);
    assert!(paid.iter().all(|o| o.status == "paid"));

    let limited = OrderRepo::list(
        &pool,
        &OrderListQuery {
            status: None,
            limit: Some(2),
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(limited.len(), 2);
}
