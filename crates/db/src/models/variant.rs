//! Product variant entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rigline_core::types::{Cents, DbId, Timestamp};

/// A row from the `product_variants` table.
///
/// Variants are owned by their product (`ON DELETE CASCADE`). The
/// model number is only locally distinguishing within the product and
/// is the sole key used for remote matching.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductVariant {
    pub id: DbId,
    pub product_id: DbId,
    pub model_number: String,
    pub capacity: Option<String>,
    pub length: Option<String>,
    pub end_connection: Option<String>,
    /// JSONB string→string map of custom axis values.
    pub custom_values: serde_json::Value,
    /// `None` means "use the product's base price".
    pub price_cents: Option<Cents>,
    pub remote_variant_id: Option<String>,
    pub remote_price_cents: Option<Cents>,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for direct single-variant edits (price and link fields).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVariant {
    pub price_cents: Option<Cents>,
    pub remote_variant_id: Option<String>,
}

/// Batch price command: one value applied to many selected variants in
/// a single statement.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkPrice {
    pub variant_ids: Vec<DbId>,
    pub price_cents: Cents,
}

/// Counts reported by a reconcile pass over a product's variants.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileStats {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}
