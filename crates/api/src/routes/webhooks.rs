//! Root-level webhook routes (public; verified by signature, not by
//! bearer token).

use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /webhooks/stripe       -> stripe
/// POST /webhooks/lemonsqueezy -> lemonsqueezy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/stripe", post(webhook::stripe))
        .route("/webhooks/lemonsqueezy", post(webhook::lemonsqueezy))
}
