//! Handlers for variant-level operations nested under a product.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use rigline_core::error::CoreError;
use rigline_core::types::DbId;
use rigline_db::models::variant::{BulkPrice, ProductVariant, UpdateVariant};
use rigline_db::repositories::VariantRepo;

use crate::auth::middleware::AuthAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products/{product_id}/variants
pub async fn list(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<Vec<ProductVariant>>> {
    let variants = VariantRepo::list_by_product(&state.pool, product_id).await?;
    Ok(Json(variants))
}

/// PUT /api/v1/products/{product_id}/variants/{id}
///
/// Direct edit of a single variant's price or remote link.
pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path((product_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateVariant>,
) -> AppResult<Json<ProductVariant>> {
    // Reject ids that exist but belong to another product.
    let existing = VariantRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|v| v.product_id == product_id)
        .ok_or(CoreError::NotFound {
            entity: "ProductVariant",
            id,
        })?;

    let variant = VariantRepo::update(&state.pool, existing.id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ProductVariant",
            id,
        })?;
    Ok(Json(variant))
}

/// Result payload for the bulk price endpoint.
#[derive(Debug, Serialize)]
pub struct BulkPriceResponse {
    pub updated: u64,
}

/// POST /api/v1/products/{product_id}/variants/bulk-price
///
/// Applies one price to many selected variants as a single batch
/// statement rather than N independent requests.
pub async fn bulk_price(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(product_id): Path<DbId>,
    Json(input): Json<BulkPrice>,
) -> AppResult<Json<DataResponse<BulkPriceResponse>>> {
    if input.variant_ids.is_empty() {
        return Err(AppError::BadRequest("variant_ids must not be empty".into()));
    }

    let updated =
        VariantRepo::bulk_price(&state.pool, product_id, &input.variant_ids, input.price_cents)
            .await?;

    tracing::info!(product_id, updated, "Bulk price applied");
    Ok(Json(DataResponse::new(BulkPriceResponse { updated })))
}
