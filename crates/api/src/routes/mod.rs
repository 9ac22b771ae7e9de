//! Route tree assembly.

pub mod blogs;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod services;
pub mod webhooks;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
///
/// /products                                    list (category filter), create
/// /products/remote-catalog                     provider product listing
/// /products/{id}                               get, update, delete
/// /products/{id}/variants                      list
/// /products/{id}/variants/{vid}                update (price/link)
/// /products/{id}/variants/regenerate           rewrite variant set (POST)
/// /products/{id}/variants/bulk-price           batch price apply (POST)
/// /products/{id}/sync-variants                 remote price sync (POST)
/// /products/{id}/checkout                      create provider checkout (POST)
///
/// /categories[/{id}]                           CRUD
/// /blogs[/{id}|/slug/{slug}]                   CRUD + slug lookup
/// /services[/{id}|/slug/{slug}]                CRUD + slug lookup
///
/// /orders                                      list
/// /orders/{id}                                 detail with items
/// /orders/{id}/status                          admin status transition (PUT)
/// ```
///
/// Webhooks are mounted at the root (`/webhooks/...`), outside this
/// tree, because providers do not send bearer tokens.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/blogs", blogs::router())
        .nest("/services", services::router())
        .nest("/orders", orders::router())
}
