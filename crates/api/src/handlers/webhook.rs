//! Webhook endpoints for payment providers.
//!
//! These are the only public write endpoints. Signature verification
//! runs against the raw request body before any JSON parsing; once a
//! secret is configured there is no fallback processing of unverified
//! payloads. Unrecognized event kinds are acknowledged and ignored.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use rigline_core::error::CoreError;
use rigline_payments::ingest;
use rigline_payments::webhook::{
    self, parse_lemonsqueezy_event, parse_stripe_event, signature_header, Provider,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /webhooks/stripe
pub async fn stripe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<serde_json::Value>> {
    let secret = state.payments.stripe.webhook_secret.clone();
    handle(state, Provider::Stripe, secret, headers, body).await
}

/// POST /webhooks/lemonsqueezy
pub async fn lemonsqueezy(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<serde_json::Value>> {
    let secret = state.payments.lemonsqueezy.webhook_secret.clone();
    handle(state, Provider::LemonSqueezy, secret, headers, body).await
}

/// Shared verification + normalization + ingestion flow.
async fn handle(
    state: AppState,
    provider: Provider,
    secret: Option<String>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<serde_json::Value>> {
    let signature = headers
        .get(signature_header(provider))
        .and_then(|v| v.to_str().ok());

    if !webhook::verify(provider, secret.as_deref(), &body, signature) {
        tracing::warn!(provider = provider.as_str(), "Webhook signature rejected");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Webhook signature verification failed".into(),
        )));
    }

    let payload: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON payload: {e}")))?;

    let event = match provider {
        Provider::Stripe => parse_stripe_event(&payload),
        Provider::LemonSqueezy => parse_lemonsqueezy_event(&payload),
    };

    let outcome = ingest::ingest(&state.pool, provider, event, payload).await?;
    tracing::info!(provider = provider.as_str(), ?outcome, "Webhook processed");

    Ok(Json(serde_json::json!({
        "received": true,
        "outcome": outcome,
    })))
}
