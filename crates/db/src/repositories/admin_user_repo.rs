//! Repository for the `admin_users` table.

use sqlx::PgPool;

use rigline_core::types::DbId;

use crate::models::admin_user::{AdminUser, CreateAdminUser};

/// Column list for the `admin_users` table.
const COLUMNS: &str = "id, email, password_hash, display_name, is_active, \
    created_at, updated_at";

/// Provides lookup and creation for admin users.
pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Insert a new admin user. The password must already be hashed.
    pub async fn create(pool: &PgPool, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error> {
        let insert_query = format!(
            "INSERT INTO admin_users (email, password_hash, display_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminUser>(&insert_query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Find an admin user by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE id = $1");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active admin user by email (login lookup).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_users \
             WHERE lower(email) = lower($1) AND is_active = true"
        );
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
