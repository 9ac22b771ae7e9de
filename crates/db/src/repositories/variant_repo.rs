//! Repository for the `product_variants` table.
//!
//! Besides plain CRUD this module owns the two variant-set rewrite
//! strategies used on product save:
//!
//! - [`VariantRepo::reconcile`]: upsert by model number inside one
//!   transaction, preserving row identity, remote links, and
//!   hand-edited prices for model numbers that survive the new
//!   generation pass.
//! - [`VariantRepo::replace_all`]: the destructive delete-then-insert
//!   rewrite, kept behind an explicit admin action. Prior prices and
//!   links are intentionally lost.

use std::collections::{BTreeMap, HashSet};

use sqlx::PgPool;

use rigline_core::types::{Cents, DbId, Timestamp};
use rigline_core::variants::GeneratedVariant;

use crate::models::variant::{ProductVariant, ReconcileStats, UpdateVariant};

/// Column list for the `product_variants` table.
const COLUMNS: &str = "id, product_id, model_number, capacity, length, end_connection, \
    custom_values, price_cents, remote_variant_id, remote_price_cents, last_synced_at, \
    created_at, updated_at";

/// Provides CRUD and set-rewrite operations for product variants.
pub struct VariantRepo;

impl VariantRepo {
    /// List all variants of a product, ordered by model number.
    pub async fn list_by_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProductVariant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_variants \
             WHERE product_id = $1 \
             ORDER BY model_number, id"
        );
        sqlx::query_as::<_, ProductVariant>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// Find a variant by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductVariant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM product_variants WHERE id = $1");
        sqlx::query_as::<_, ProductVariant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a variant's price and remote link fields. Only non-`None`
    /// fields are applied. Returns `None` if no row exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVariant,
    ) -> Result<Option<ProductVariant>, sqlx::Error> {
        let update_query = format!(
            "UPDATE product_variants SET \
                price_cents = COALESCE($2, price_cents), \
                remote_variant_id = COALESCE($3, remote_variant_id), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductVariant>(&update_query)
            .bind(id)
            .bind(input.price_cents)
            .bind(&input.remote_variant_id)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful remote link: remote id, authoritative price,
    /// and a fresh sync timestamp.
    pub async fn mark_synced(
        pool: &PgPool,
        id: DbId,
        remote_variant_id: &str,
        remote_price_cents: Cents,
        when: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE product_variants SET \
                remote_variant_id = $2, \
                price_cents = $3, \
                remote_price_cents = $3, \
                last_synced_at = $4, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(remote_variant_id)
        .bind(remote_price_cents)
        .bind(when)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Apply one price to many variants of a product in a single
    /// statement. Returns the number of rows updated.
    pub async fn bulk_price(
        pool: &PgPool,
        product_id: DbId,
        variant_ids: &[DbId],
        price_cents: Cents,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE product_variants SET price_cents = $3, updated_at = now() \
             WHERE product_id = $1 AND id = ANY($2)",
        )
        .bind(product_id)
        .bind(variant_ids)
        .bind(price_cents)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Destructively replace a product's variants with a fresh
    /// generation pass, in one transaction. All prior rows (including
    /// their prices and remote links) are deleted.
    pub async fn replace_all(
        pool: &PgPool,
        product_id: DbId,
        generated: &[GeneratedVariant],
    ) -> Result<Vec<ProductVariant>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let mut rows = Vec::with_capacity(generated.len());
        for variant in generated {
            rows.push(Self::insert_inner(&mut tx, product_id, variant).await?);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// Reconcile a product's variants against a fresh generation pass,
    /// in one transaction:
    ///
    /// - model numbers present in both keep their row (id, remote link,
    ///   sync timestamp); attributes are refreshed, and the price is
    ///   overwritten only when `reset_prices` is set (base pricing
    ///   mode);
    /// - model numbers no longer produced are deleted;
    /// - new model numbers are inserted.
    ///
    /// Duplicate model numbers in the generated set collapse to their
    /// first occurrence so the upsert stays well-defined.
    pub async fn reconcile(
        pool: &PgPool,
        product_id: DbId,
        generated: &[GeneratedVariant],
        reset_prices: bool,
    ) -> Result<ReconcileStats, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, ProductVariant>(&format!(
            "SELECT {COLUMNS} FROM product_variants WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_all(&mut *tx)
        .await?;

        let existing_by_model: BTreeMap<&str, &ProductVariant> = existing
            .iter()
            .map(|v| (v.model_number.as_str(), v))
            .collect();

        let mut stats = ReconcileStats::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for variant in generated {
            if !seen.insert(variant.model_number.as_str()) {
                continue;
            }
            match existing_by_model.get(variant.model_number.as_str()) {
                Some(current) => {
                    Self::refresh_inner(&mut tx, current.id, variant, reset_prices).await?;
                    stats.updated += 1;
                }
                None => {
                    Self::insert_inner(&mut tx, product_id, variant).await?;
                    stats.inserted += 1;
                }
            }
        }

        for stale in existing.iter().filter(|v| !seen.contains(v.model_number.as_str())) {
            sqlx::query("DELETE FROM product_variants WHERE id = $1")
                .bind(stale.id)
                .execute(&mut *tx)
                .await?;
            stats.deleted += 1;
        }

        tx.commit().await?;
        tracing::debug!(
            product_id,
            inserted = stats.inserted,
            updated = stats.updated,
            deleted = stats.deleted,
            "Variant reconcile committed"
        );
        Ok(stats)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert one generated variant within an existing transaction.
    async fn insert_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: DbId,
        variant: &GeneratedVariant,
    ) -> Result<ProductVariant, sqlx::Error> {
        let insert_query = format!(
            "INSERT INTO product_variants \
                (product_id, model_number, capacity, length, end_connection, \
                 custom_values, price_cents) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductVariant>(&insert_query)
            .bind(product_id)
            .bind(&variant.model_number)
            .bind(&variant.capacity)
            .bind(&variant.length)
            .bind(&variant.end_connection)
            .bind(serde_json::to_value(&variant.custom_values).unwrap_or_default())
            .bind(variant.price_cents)
            .fetch_one(&mut **tx)
            .await
    }

    /// Refresh a surviving row's generated attributes within an
    /// existing transaction, preserving link and sync fields.
    async fn refresh_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        variant: &GeneratedVariant,
        reset_prices: bool,
    ) -> Result<(), sqlx::Error> {
        if reset_prices {
            sqlx::query(
                "UPDATE product_variants SET \
                    capacity = $2, length = $3, end_connection = $4, \
                    custom_values = $5, price_cents = $6, updated_at = now() \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&variant.capacity)
            .bind(&variant.length)
            .bind(&variant.end_connection)
            .bind(serde_json::to_value(&variant.custom_values).unwrap_or_default())
            .bind(variant.price_cents)
            .execute(&mut **tx)
            .await?;
        } else {
            sqlx::query(
                "UPDATE product_variants SET \
                    capacity = $2, length = $3, end_connection = $4, \
                    custom_values = $5, updated_at = now() \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&variant.capacity)
            .bind(&variant.length)
            .bind(&variant.end_connection)
            .bind(serde_json::to_value(&variant.custom_values).unwrap_or_default())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
