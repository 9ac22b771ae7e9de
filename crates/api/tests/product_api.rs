//! Integration tests for the product surface: creation with variant
//! generation, axis edits driving reconciliation, forced regeneration,
//! and batch pricing.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, put_json};
use sqlx::PgPool;

fn spreader_bar() -> serde_json::Value {
    serde_json::json!({
        "title": "Heavy Duty Spreader Bar",
        "base_price_cents": 50_000,
        "capacities": "10,20",
        "lengths": "6,12",
    })
}

// ---------------------------------------------------------------------------
// Test: creation expands the documented example
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_generates_the_cartesian_product(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/products", spreader_bar()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["slug"], "heavy-duty-spreader-bar");

    let variants = json["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 4);

    let models: Vec<&str> = variants
        .iter()
        .map(|v| v["model_number"].as_str().unwrap())
        .collect();
    assert_eq!(
        models,
        vec![
            "HEA-10tons-6ft",
            "HEA-10tons-12ft",
            "HEA-20tons-6ft",
            "HEA-20tons-12ft",
        ]
    );
    for variant in variants {
        assert_eq!(variant["price_cents"], 50_000);
        // Display attribute keeps the space ("10 tons"), unlike the
        // model number segment ("10tons").
        assert!(variant["capacity"].as_str().unwrap().contains(" tons"));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_axes_generates_nothing(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/products",
        serde_json::json!({ "title": "Custom Fabrication" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["variants"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_can_be_restricted_to_one_category(pool: PgPool) {
    let app = common::build_test_app(pool);

    let category = body_json(
        post_json(
            app.clone(),
            "/api/v1/categories",
            serde_json::json!({ "name": "Spreader Bars" }),
        )
        .await,
    )
    .await;
    let category_id = category["id"].as_i64().unwrap();

    let mut in_category = spreader_bar();
    in_category["category_id"] = serde_json::json!(category_id);
    post_json(app.clone(), "/api/v1/products", in_category).await;
    post_json(
        app.clone(),
        "/api/v1/products",
        serde_json::json!({ "title": "Lifting Magnet" }),
    )
    .await;

    let all = body_json(get_auth(app.clone(), "/api/v1/products").await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let filtered = body_json(
        get_auth(app, &format!("/api/v1/products?category_id={category_id}")).await,
    )
    .await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["title"], "Heavy Duty Spreader Bar");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_slug_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = post_json(app.clone(), "/api/v1/products", spreader_bar()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/v1/products", spreader_bar()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Test: axis edits reconcile instead of rebuilding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn axis_edit_preserves_surviving_variant_rows(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();
    let kept_id = created["variants"][0]["id"].as_i64().unwrap();
    assert_eq!(created["variants"][0]["model_number"], "HEA-10tons-6ft");

    let response = put_json(
        app.clone(),
        &format!("/api/v1/products/{product_id}"),
        serde_json::json!({ "capacities": "10" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let variants = json["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);

    // The surviving model number kept its row id.
    let survivor = variants
        .iter()
        .find(|v| v["model_number"] == "HEA-10tons-6ft")
        .unwrap();
    assert_eq!(survivor["id"].as_i64().unwrap(), kept_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_axis_edit_leaves_variants_untouched(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();
    let ids_before: Vec<i64> = created["variants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();

    let response = put_json(
        app,
        &format!("/api/v1/products/{product_id}"),
        serde_json::json!({ "description": "Engineered lifting beam" }),
    )
    .await;
    let json = body_json(response).await;
    let ids_after: Vec<i64> = json["variants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();

    assert_eq!(ids_before, ids_after);
}

// ---------------------------------------------------------------------------
// Test: forced regeneration is destructive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn forced_regeneration_discards_row_identity(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();
    let ids_before: Vec<i64> = created["variants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();

    let response = post_json(
        app,
        &format!("/api/v1/products/{product_id}/variants/regenerate"),
        serde_json::json!({ "force": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let variants = json["data"]["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 4);
    for variant in variants {
        let id = variant["id"].as_i64().unwrap();
        assert!(!ids_before.contains(&id), "old row ids must be gone");
    }
}

// ---------------------------------------------------------------------------
// Test: batch pricing and single-variant edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_price_applies_one_value_to_selected_variants(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();
    let variants = created["variants"].as_array().unwrap();
    let selected: Vec<i64> = variants[..2]
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/products/{product_id}/variants/bulk-price"),
        serde_json::json!({ "variant_ids": selected, "price_cents": 62_500 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], 2);

    let listed = body_json(
        get_auth(app, &format!("/api/v1/products/{product_id}/variants")).await,
    )
    .await;
    let updated_count = listed
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["price_cents"] == 62_500)
        .count();
    assert_eq!(updated_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_bulk_price_selection_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();

    let response = post_json(
        app,
        &format!("/api/v1/products/{product_id}/variants/bulk-price"),
        serde_json::json!({ "variant_ids": [], "price_cents": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn variant_update_rejects_foreign_product(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let variant_id = created["variants"][0]["id"].as_i64().unwrap();

    let other = body_json(
        post_json(
            app.clone(),
            "/api/v1/products",
            serde_json::json!({ "title": "Lifting Magnet" }),
        )
        .await,
    )
    .await;
    let other_id = other["id"].as_i64().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/products/{other_id}/variants/{variant_id}"),
        serde_json::json!({ "price_cents": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: sync preconditions surface as guidance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_without_remote_link_fails_fast_with_guidance(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();

    let response = post_json(
        app,
        &format!("/api/v1/products/{product_id}/sync-variants"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_LINKED");
    assert!(json["error"].as_str().unwrap().contains("remote product id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_requires_a_linked_variant(pool: PgPool) {
    let app = common::build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/products", spreader_bar()).await).await;
    let product_id = created["id"].as_i64().unwrap();
    let variant_id = created["variants"][0]["id"].as_i64().unwrap();

    let response = post_json(
        app,
        &format!("/api/v1/products/{product_id}/checkout"),
        serde_json::json!({ "variant_id": variant_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("run sync first"));
}
