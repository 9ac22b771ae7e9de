//! Health check handler.

use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /health
///
/// Reports service liveness plus a database round-trip check. Always
/// returns 200; a broken database shows up as `db_healthy: false`.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_healthy = rigline_db::health_check(&state.pool).await.is_ok();

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    }))
}
