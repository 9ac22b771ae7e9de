//! Repository for the `products` table.

use sqlx::PgPool;

use rigline_core::types::{DbId, Timestamp};

use crate::models::product::{CreateProduct, Product, ProductWithVariants, UpdateProduct};
use crate::repositories::VariantRepo;

/// Column list for the `products` table.
const COLUMNS: &str = "id, title, slug, description, content, category_id, \
    pricing_mode, base_price_cents, currency, auto_generate_variants, show_variants, \
    capacities, capacity_unit, lengths, length_unit, connections, custom_fields, \
    remote_product_id, payment_link_url, last_synced_at, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => rigline_core::slug::slugify(&input.title),
        };

        let insert_query = format!(
            "INSERT INTO products \
                (title, slug, description, content, category_id, pricing_mode, \
                 base_price_cents, currency, auto_generate_variants, show_variants, \
                 capacities, capacity_unit, lengths, length_unit, connections, \
                 custom_fields, remote_product_id, payment_link_url) \
             VALUES ($1, $2, $3, COALESCE($4, '[]'::jsonb), $5, COALESCE($6, 'base'), \
                 $7, COALESCE($8, 'usd'), COALESCE($9, true), COALESCE($10, true), \
                 COALESCE($11, ''), COALESCE($12, 'tons'), COALESCE($13, ''), \
                 COALESCE($14, 'ft'), COALESCE($15, ''), COALESCE($16, '[]'::jsonb), \
                 $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&insert_query)
            .bind(&input.title)
            .bind(&slug)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.category_id)
            .bind(&input.pricing_mode)
            .bind(input.base_price_cents)
            .bind(&input.currency)
            .bind(input.auto_generate_variants)
            .bind(input.show_variants)
            .bind(&input.capacities)
            .bind(&input.capacity_unit)
            .bind(&input.lengths)
            .bind(&input.length_unit)
            .bind(&input.connections)
            .bind(&input.custom_fields)
            .bind(&input.remote_product_id)
            .bind(&input.payment_link_url)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by its unique slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE slug = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID, enriched with its variants.
    pub async fn find_by_id_with_variants(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithVariants>, sqlx::Error> {
        let product = Self::find_by_id(pool, id).await?;
        match product {
            Some(product) => {
                let variants = VariantRepo::list_by_product(pool, product.id).await?;
                Ok(Some(ProductWithVariants { product, variants }))
            }
            None => Ok(None),
        }
    }

    /// List all products, ordered by title.
    pub async fn list(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY title");
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// List products within one category, ordered by title.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE category_id = $1 ORDER BY title");
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Update a product. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let update_query = format!(
            "UPDATE products SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                content = COALESCE($4, content), \
                category_id = COALESCE($5, category_id), \
                pricing_mode = COALESCE($6, pricing_mode), \
                base_price_cents = COALESCE($7, base_price_cents), \
                currency = COALESCE($8, currency), \
                auto_generate_variants = COALESCE($9, auto_generate_variants), \
                show_variants = COALESCE($10, show_variants), \
                capacities = COALESCE($11, capacities), \
                capacity_unit = COALESCE($12, capacity_unit), \
                lengths = COALESCE($13, lengths), \
                length_unit = COALESCE($14, length_unit), \
                connections = COALESCE($15, connections), \
                custom_fields = COALESCE($16, custom_fields), \
                remote_product_id = COALESCE($17, remote_product_id), \
                payment_link_url = COALESCE($18, payment_link_url), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&update_query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.category_id)
            .bind(&input.pricing_mode)
            .bind(input.base_price_cents)
            .bind(&input.currency)
            .bind(input.auto_generate_variants)
            .bind(input.show_variants)
            .bind(&input.capacities)
            .bind(&input.capacity_unit)
            .bind(&input.lengths)
            .bind(&input.length_unit)
            .bind(&input.connections)
            .bind(&input.custom_fields)
            .bind(&input.remote_product_id)
            .bind(&input.payment_link_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product (variants cascade).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp the product-level sync timestamp after a synchronizer run.
    pub async fn stamp_synced(
        pool: &PgPool,
        id: DbId,
        when: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE products SET last_synced_at = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(when)
            .execute(pool)
            .await?;
        Ok(())
    }
}
