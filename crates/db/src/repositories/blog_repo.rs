//! Repository for the `blogs` table.

use sqlx::PgPool;

use rigline_core::types::DbId;

use crate::models::blog::{Blog, CreateBlog, UpdateBlog};

/// Column list for the `blogs` table.
const COLUMNS: &str = "id, title, slug, excerpt, content, is_published, published_at, \
    created_at, updated_at";

/// Provides CRUD operations for blog posts.
pub struct BlogRepo;

impl BlogRepo {
    /// Insert a new blog post. Publishing on create stamps
    /// `published_at`.
    pub async fn create(pool: &PgPool, input: &CreateBlog) -> Result<Blog, sqlx::Error> {
        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => rigline_core::slug::slugify(&input.title),
        };

        let insert_query = format!(
            "INSERT INTO blogs (title, slug, excerpt, content, is_published, published_at) \
             VALUES ($1, $2, $3, COALESCE($4, '[]'::jsonb), COALESCE($5, false), \
                 CASE WHEN COALESCE($5, false) THEN now() END) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&insert_query)
            .bind(&input.title)
            .bind(&slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Find a blog post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE id = $1");
        sqlx::query_as::<_, Blog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a blog post by its unique slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Blog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blogs WHERE slug = $1");
        sqlx::query_as::<_, Blog>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all posts, newest first, optionally published only.
    pub async fn list(pool: &PgPool, published_only: bool) -> Result<Vec<Blog>, sqlx::Error> {
        let query = if published_only {
            format!(
                "SELECT {COLUMNS} FROM blogs \
                 WHERE is_published = true \
                 ORDER BY published_at DESC NULLS LAST, id DESC"
            )
        } else {
            format!("SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC")
        };
        sqlx::query_as::<_, Blog>(&query).fetch_all(pool).await
    }

    /// Update a blog post. Only non-`None` fields are applied. First
    /// publication stamps `published_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlog,
    ) -> Result<Option<Blog>, sqlx::Error> {
        let update_query = format!(
            "UPDATE blogs SET \
                title = COALESCE($2, title), \
                excerpt = COALESCE($3, excerpt), \
                content = COALESCE($4, content), \
                is_published = COALESCE($5, is_published), \
                published_at = CASE \
                    WHEN COALESCE($5, is_published) AND published_at IS NULL THEN now() \
                    ELSE published_at END, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&update_query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Delete a blog post.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
