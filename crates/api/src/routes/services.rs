//! Route definitions for service pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::service;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /slug/{slug}  -> get_by_slug
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service::list).post(service::create))
        .route("/slug/{slug}", get(service::get_by_slug))
        .route(
            "/{id}",
            get(service::get_by_id)
                .put(service::update)
                .delete(service::delete),
        )
}
