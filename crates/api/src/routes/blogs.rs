//! Route definitions for blog posts.

use axum::routing::get;
use axum::Router;

use crate::handlers::blog;
use crate::state::AppState;

/// Routes mounted at `/blogs`.
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
        .route("/", get(blog::list).post(blog::create))
        .route("/slug/{slug}", get(blog::get_by_slug))
        .route(
            "/{id}",
            get(blog::get_by_id).put(blog::update).delete(blog::delete),
        )
}
