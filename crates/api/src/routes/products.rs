//! Route definitions for products and their nested variant operations.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{product, variant};
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /                               -> list
/// POST   /                               -> create
/// GET    /remote-catalog                 -> list_remote_catalog
/// GET    /{id}                           -> get_by_id
/// PUT    /{id}                           -> update
/// DELETE /{id}                           -> delete
/// GET    /{id}/variants                  -> variant list
/// PUT    /{id}/variants/{vid}            -> variant update
/// POST   /{id}/variants/regenerate       -> regenerate_variants
/// POST   /{id}/variants/bulk-price       -> bulk_price
/// POST   /{id}/sync-variants             -> sync_variants
/// POST   /{id}/checkout                  -> create_checkout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list).post(product::create))
        .route("/remote-catalog", get(product::list_remote_catalog))
        .route(
            "/{id}",
            get(product::get_by_id)
                .put(product::update)
                .delete(product::delete),
        )
        .route("/{id}/variants", get(variant::list))
        .route("/{id}/variants/{vid}", put(variant::update))
        .route("/{id}/variants/regenerate", post(product::regenerate_variants))
        .route("/{id}/variants/bulk-price", post(variant::bulk_price))
        .route("/{id}/sync-variants", post(product::sync_variants))
        .route("/{id}/checkout", post(product::create_checkout))
}
