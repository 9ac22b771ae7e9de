//! Repository for the `services` table.

use sqlx::PgPool;

use rigline_core::types::DbId;

use crate::models::service::{CreateService, Service, UpdateService};

/// Column list for the `services` table.
const COLUMNS: &str = "id, title, slug, description, content, sort_order, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for service pages.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service page.
    pub async fn create(pool: &PgPool, input: &CreateService) -> Result<Service, sqlx::Error> {
        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => rigline_core::slug::slugify(&input.title),
        };

        let insert_query = format!(
            "INSERT INTO services (title, slug, description, content, sort_order, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, '[]'::jsonb), COALESCE($5, 0), \
                 COALESCE($6, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&insert_query)
            .bind(&input.title)
            .bind(&slug)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a service page by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a service page by its unique slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE slug = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all service pages, optionally including inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Service>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM services ORDER BY sort_order, title")
        } else {
            format!(
                "SELECT {COLUMNS} FROM services \
                 WHERE is_active = true \
                 ORDER BY sort_order, title"
            )
        };
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    /// Update a service page. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let update_query = format!(
            "UPDATE services SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                content = COALESCE($4, content), \
                sort_order = COALESCE($5, sort_order), \
                is_active = COALESCE($6, is_active), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&update_query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a service page.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
