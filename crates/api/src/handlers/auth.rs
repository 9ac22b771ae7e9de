//! Admin login handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use rigline_core::error::CoreError;
use rigline_db::models::admin_user::LoginRequest;
use rigline_db::repositories::AdminUserRepo;

use crate::auth::jwt::issue_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in_mins: i64,
}

/// POST /api/v1/auth/login
///
/// Exchanges email + password for a bearer token. Unknown emails and
/// wrong passwords produce the same 401 so the endpoint does not leak
/// which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let unauthorized =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = AdminUserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(unauthorized)?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(unauthorized());
    }

    let access_token = issue_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(admin_id = user.id, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in_mins: state.config.jwt.access_token_expiry_mins,
    }))
}
