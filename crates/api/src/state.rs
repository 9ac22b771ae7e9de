use std::sync::Arc;

use rigline_payments::{LemonSqueezyClient, PaymentsConfig};

use crate::config::ServerConfig;

/// Shared state handed to every handler via `State<AppState>`.
///
/// Cloning is cheap: the pool is internally reference-counted and the
/// rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: rigline_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Webhook secrets; the signature check reads these per request.
    pub payments: Arc<PaymentsConfig>,
    /// Lemon Squeezy REST client shared by sync, catalog listing, and
    /// checkout creation.
    pub lemonsqueezy: Arc<LemonSqueezyClient>,
}
