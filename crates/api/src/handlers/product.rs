//! Handlers for the `/products` resource.
//!
//! Product saves drive variant generation: when auto-generation is on
//! and any specification axis changed, the saved axes are expanded and
//! reconciled against the stored variant set in one transaction.
//! The destructive full rewrite is available behind an explicit
//! `force` flag on the regenerate endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use rigline_core::error::CoreError;
use rigline_core::types::DbId;
use rigline_core::variants::{generate_variants, PricingMode};
use rigline_db::models::product::{CreateProduct, Product, ProductWithVariants, UpdateProduct};
use rigline_db::models::variant::ReconcileStats;
use rigline_db::repositories::{ProductRepo, VariantRepo};
use rigline_payments::sync::{self, SyncResult};

use crate::auth::middleware::AuthAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/products
///
/// Creates the product and, when auto-generation is enabled, its
/// initial variant set.
pub async fn create(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<ProductWithVariants>)> {
    let product = ProductRepo::create(&state.pool, &input).await?;

    let variants = if product.auto_generate_variants {
        let generated = generate_variants(&product.variant_spec());
        VariantRepo::replace_all(&state.pool, product.id, &generated).await?
    } else {
        Vec::new()
    };

    tracing::info!(
        product_id = product.id,
        variant_count = variants.len(),
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(ProductWithVariants { product, variants })))
}

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<DbId>,
}

/// GET /api/v1/products
///
/// Ordered by title; optionally restricted to one category.
pub async fn list(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = match query.category_id {
        Some(category_id) => ProductRepo::list_by_category(&state.pool, category_id).await?,
        None => ProductRepo::list(&state.pool).await?,
    };
    Ok(Json(products))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProductWithVariants>> {
    let product = ProductRepo::find_by_id_with_variants(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    Ok(Json(product))
}

/// PUT /api/v1/products/{id}
///
/// Applies the patch, then reconciles the variant set when
/// auto-generation is on and any axis value changed. Reconciliation
/// preserves row identity, remote links, and hand-edited prices for
/// surviving model numbers; stale model numbers are deleted.
pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<ProductWithVariants>> {
    let before = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    let updated = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    if updated.auto_generate_variants && updated.axes_differ(&before) {
        let generated = generate_variants(&updated.variant_spec());
        let reset_prices = PricingMode::parse(&updated.pricing_mode) == PricingMode::Base;
        let stats = VariantRepo::reconcile(&state.pool, id, &generated, reset_prices).await?;
        tracing::info!(
            product_id = id,
            inserted = stats.inserted,
            updated = stats.updated,
            deleted = stats.deleted,
            "Variants reconciled after axis change"
        );
    }

    let enriched = ProductRepo::find_by_id_with_variants(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;
    Ok(Json(enriched))
}

/// DELETE /api/v1/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Product",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Variant set operations
// ---------------------------------------------------------------------------

/// Body for the regenerate endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RegenerateRequest {
    /// `true` performs the destructive full rewrite: every existing
    /// row is deleted, losing hand-edited prices and remote links.
    #[serde(default)]
    pub force: bool,
}

/// Result payload for the regenerate endpoint.
#[derive(Debug, Serialize)]
pub struct RegenerateResponse {
    pub variants: Vec<rigline_db::models::variant::ProductVariant>,
    /// Present for reconcile runs; `None` for forced rewrites.
    pub stats: Option<ReconcileStats>,
}

/// POST /api/v1/products/{id}/variants/regenerate
pub async fn regenerate_variants(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<RegenerateRequest>,
) -> AppResult<Json<DataResponse<RegenerateResponse>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    let generated = generate_variants(&product.variant_spec());

    let stats = if input.force {
        VariantRepo::replace_all(&state.pool, id, &generated).await?;
        None
    } else {
        let reset_prices = PricingMode::parse(&product.pricing_mode) == PricingMode::Base;
        Some(VariantRepo::reconcile(&state.pool, id, &generated, reset_prices).await?)
    };

    let variants = VariantRepo::list_by_product(&state.pool, id).await?;
    tracing::info!(
        product_id = id,
        forced = input.force,
        variant_count = variants.len(),
        "Variants regenerated"
    );

    Ok(Json(DataResponse::new(RegenerateResponse {
        variants,
        stats,
    })))
}

// ---------------------------------------------------------------------------
// Remote sync and checkout
// ---------------------------------------------------------------------------

/// GET /api/v1/products/remote-catalog
///
/// Lists the provider's products for the configured store, so the
/// admin can pick the remote product id to link a local product to.
pub async fn list_remote_catalog(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<DataResponse<Vec<rigline_payments::client::RemoteProduct>>>> {
    let products = state.lemonsqueezy.list_products().await?;
    Ok(Json(DataResponse::new(products)))
}

/// POST /api/v1/products/{id}/sync-variants
///
/// Runs the variant price synchronizer against the linked remote
/// product. An unlinked product fails fast with guidance; a linked
/// product with zero remote variants returns setup instructions.
pub async fn sync_variants(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SyncResult>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    let result = sync::sync_product(&state.pool, &state.lemonsqueezy, &product).await?;
    Ok(Json(DataResponse::new(result)))
}

/// Body for checkout creation.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub variant_id: DbId,
}

/// Result payload for checkout creation.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// POST /api/v1/products/{id}/checkout
///
/// Creates a hosted provider checkout for one of the product's
/// variants. The variant must already be linked to a remote variant
/// (run sync first).
pub async fn create_checkout(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<Json<DataResponse<CheckoutResponse>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    let variant = VariantRepo::find_by_id(&state.pool, input.variant_id)
        .await?
        .filter(|v| v.product_id == product.id)
        .ok_or(CoreError::NotFound {
            entity: "ProductVariant",
            id: input.variant_id,
        })?;

    let remote_variant_id = variant.remote_variant_id.as_deref().ok_or_else(|| {
        AppError::BadRequest(format!(
            "Variant '{}' is not linked to a remote variant; run sync first.",
            variant.model_number
        ))
    })?;

    let custom = serde_json::json!({
        "product_slug": product.slug,
        "variant_id": variant.id.to_string(),
    });
    let checkout = state
        .lemonsqueezy
        .create_checkout(remote_variant_id, custom)
        .await?;

    Ok(Json(DataResponse::new(CheckoutResponse {
        url: checkout.attributes.url,
    })))
}
