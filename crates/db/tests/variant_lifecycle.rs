//! Integration tests for the two variant-set rewrite strategies and
//! variant-level writes.

use std::collections::HashSet;

use sqlx::PgPool;

use rigline_core::variants::generate_variants;
use rigline_db::models::product::{CreateProduct, Product, UpdateProduct};
use rigline_db::models::variant::UpdateVariant;
use rigline_db::repositories::{ProductRepo, VariantRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_product(pool: &PgPool, capacities: &str, lengths: &str) -> Product {
    seed_titled_product(pool, "Heavy Duty Spreader Bar", capacities, lengths).await
}

async fn seed_titled_product(
    pool: &PgPool,
    title: &str,
    capacities: &str,
    lengths: &str,
) -> Product {
    ProductRepo::create(
        pool,
        &CreateProduct {
            title: title.to_string(),
            slug: None,
            description: None,
            content: None,
            category_id: None,
            pricing_mode: Some("base".to_string()),
            base_price_cents: Some(50_000),
            currency: None,
            auto_generate_variants: None,
            show_variants: None,
            capacities: Some(capacities.to_string()),
            capacity_unit: None,
            lengths: Some(lengths.to_string()),
            length_unit: None,
            connections: None,
            custom_fields: None,
            remote_product_id: None,
            payment_link_url: None,
        },
    )
    .await
    .unwrap()
}

fn model_numbers(variants: &[rigline_db::models::variant::ProductVariant]) -> Vec<String> {
    variants.iter().map(|v| v.model_number.clone()).collect()
}

// ---------------------------------------------------------------------------
// Test: destructive replace
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn replace_all_generates_the_documented_example(pool: PgPool) {
    let product = seed_product(&pool, "10,20", "6,12").await;
    let generated = generate_variants(&product.variant_spec());
    let rows = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(
        model_numbers(&rows),
        vec![
            "HEA-10tons-6ft",
            "HEA-10tons-12ft",
            "HEA-20tons-6ft",
            "HEA-20tons-12ft",
        ]
    );
    for row in &rows {
        assert_eq!(row.price_cents, Some(50_000));
        assert_eq!(row.remote_variant_id, None);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replace_all_is_destructive_and_idempotent(pool: PgPool) {
    let product = seed_product(&pool, "10,20", "6,12").await;
    let generated = generate_variants(&product.variant_spec());

    let first = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    // Hand-edit a price and a link; a forced rewrite must lose both.
    VariantRepo::update(
        &pool,
        first[0].id,
        &UpdateVariant {
            price_cents: Some(99_999),
            remote_variant_id: Some("r1".to_string()),
        },
    )
    .await
    .unwrap();

    let second = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    // Same model numbers and count, distinct row identities.
    assert_eq!(model_numbers(&first), model_numbers(&second));
    let first_ids: HashSet<i64> = first.iter().map(|v| v.id).collect();
    assert!(second.iter().all(|v| !first_ids.contains(&v.id)));

    // Prices are back to the base price; the link is gone.
    for row in &second {
        assert_eq!(row.price_cents, Some(50_000));
        assert_eq!(row.remote_variant_id, None);
    }
}

// ---------------------------------------------------------------------------
// Test: reconcile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconcile_preserves_surviving_rows_and_links(pool: PgPool) {
    let product = seed_product(&pool, "10,20", "6,12").await;
    let generated = generate_variants(&product.variant_spec());
    let initial = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    // Link one surviving variant to a remote record.
    let kept = initial
        .iter()
        .find(|v| v.model_number == "HEA-10tons-6ft")
        .unwrap();
    VariantRepo::mark_synced(&pool, kept.id, "r42", 51_000, chrono::Utc::now())
        .await
        .unwrap();

    // Narrow the capacity axis: 20-ton variants become stale.
    let updated = ProductRepo::update(
        &pool,
        product.id,
        &UpdateProduct {
            capacities: Some("10".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let regenerated = generate_variants(&updated.variant_spec());
    let stats = VariantRepo::reconcile(&pool, product.id, &regenerated, true)
        .await
        .unwrap();
    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.updated, 2);
    assert_eq!(stats.deleted, 2);

    let remaining = VariantRepo::list_by_product(&pool, product.id).await.unwrap();
    assert_eq!(
        model_numbers(&remaining),
        vec!["HEA-10tons-12ft", "HEA-10tons-6ft"]
    );

    // The surviving linked row kept its identity and remote link.
    let survivor = remaining
        .iter()
        .find(|v| v.model_number == "HEA-10tons-6ft")
        .unwrap();
    assert_eq!(survivor.id, kept.id);
    assert_eq!(survivor.remote_variant_id.as_deref(), Some("r42"));
    assert!(survivor.last_synced_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconcile_without_price_reset_keeps_hand_edits(pool: PgPool) {
    let product = seed_product(&pool, "10,20", "").await;
    let generated = generate_variants(&product.variant_spec());
    let initial = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    VariantRepo::update(
        &pool,
        initial[0].id,
        &UpdateVariant {
            price_cents: Some(77_700),
            remote_variant_id: None,
        },
    )
    .await
    .unwrap();

    // Variant pricing mode: reconcile must not touch prices.
    VariantRepo::reconcile(&pool, product.id, &generated, false)
        .await
        .unwrap();

    let reloaded = VariantRepo::find_by_id(&pool, initial[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.price_cents, Some(77_700));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconcile_inserts_new_model_numbers(pool: PgPool) {
    let product = seed_product(&pool, "10", "").await;
    let generated = generate_variants(&product.variant_spec());
    VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    let widened = ProductRepo::update(
        &pool,
        product.id,
        &UpdateProduct {
            capacities: Some("10,20,30".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let regenerated = generate_variants(&widened.variant_spec());
    let stats = VariantRepo::reconcile(&pool, product.id, &regenerated, true)
        .await
        .unwrap();
    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.deleted, 0);

    let all = VariantRepo::list_by_product(&pool, product.id).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reconcile_against_empty_axes_deletes_everything(pool: PgPool) {
    let product = seed_product(&pool, "10,20", "").await;
    let generated = generate_variants(&product.variant_spec());
    VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    let stats = VariantRepo::reconcile(&pool, product.id, &[], true)
        .await
        .unwrap();
    assert_eq!(stats.deleted, 2);

    let remaining = VariantRepo::list_by_product(&pool, product.id).await.unwrap();
    assert!(remaining.is_empty());
}

// ---------------------------------------------------------------------------
// Test: variant-level writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_price_updates_only_selected_rows_of_the_product(pool: PgPool) {
    let product = seed_product(&pool, "10,20,30", "").await;
    let generated = generate_variants(&product.variant_spec());
    let rows = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    let other = seed_titled_product(&pool, "Lifting Magnet", "", "").await;

    let selected = vec![rows[0].id, rows[1].id];
    let updated = VariantRepo::bulk_price(&pool, product.id, &selected, 123_400)
        .await
        .unwrap();
    assert_eq!(updated, 2);

    // A foreign product id in the path scopes the update to nothing.
    let cross = VariantRepo::bulk_price(&pool, other.id, &selected, 1)
        .await
        .unwrap();
    assert_eq!(cross, 0);

    let reloaded = VariantRepo::list_by_product(&pool, product.id).await.unwrap();
    let prices: Vec<Option<i64>> = reloaded.iter().map(|v| v.price_cents).collect();
    assert!(prices.contains(&Some(123_400)));
    assert!(prices.contains(&Some(50_000)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_synced_records_link_price_and_timestamp(pool: PgPool) {
    let product = seed_product(&pool, "10", "").await;
    let generated = generate_variants(&product.variant_spec());
    let rows = VariantRepo::replace_all(&pool, product.id, &generated)
        .await
        .unwrap();

    let when = chrono::Utc::now();
    VariantRepo::mark_synced(&pool, rows[0].id, "remote-7", 64_000, when)
        .await
        .unwrap();

    let synced = VariantRepo::find_by_id(&pool, rows[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(synced.remote_variant_id.as_deref(), Some("remote-7"));
    assert_eq!(synced.price_cents, Some(64_000));
    assert_eq!(synced.remote_price_cents, Some(64_000));
    assert!(synced.last_synced_at.is_some());
}
