//! Admin user entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rigline_core::types::{DbId, Timestamp};

/// A row from the `admin_users` table.
///
/// `password_hash` is an argon2 PHC string; it is never serialized
/// into API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminUser {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new admin user.
#[derive(Debug, Clone)]
pub struct CreateAdminUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}

/// Body for `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
