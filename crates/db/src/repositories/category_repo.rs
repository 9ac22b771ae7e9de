//! Repository for the `categories` table.

use sqlx::PgPool;

use rigline_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list for the `categories` table.
const COLUMNS: &str = "id, name, sort_order, created_at, updated_at";

/// Provides CRUD operations for product categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let insert_query = format!(
            "INSERT INTO categories (name, sort_order) \
             VALUES ($1, COALESCE($2, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&insert_query)
            .bind(&input.name)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories, ordered by sort order then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order, name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Update a category. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let update_query = format!(
            "UPDATE categories SET \
                name = COALESCE($2, name), \
                sort_order = COALESCE($3, sort_order), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category (products keep a null category).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
