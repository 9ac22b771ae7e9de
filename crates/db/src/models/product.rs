//! Product entity model and DTOs.
//!
//! A product carries its specification axes as the admin typed them
//! (comma-separated strings plus a JSONB array of custom field
//! definitions); the generator in `rigline-core` expands them into
//! concrete variants on save.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rigline_core::types::{Cents, DbId, Timestamp};
use rigline_core::variants::{CustomFieldDef, PricingMode, VariantSpec};

use super::variant::ProductVariant;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Ordered array of typed content blocks (see [`super::content`]).
    pub content: serde_json::Value,
    pub category_id: Option<DbId>,
    /// `"base"` or `"variant"`; parse with [`PricingMode::parse`].
    pub pricing_mode: String,
    pub base_price_cents: Option<Cents>,
    pub currency: String,
    pub auto_generate_variants: bool,
    pub show_variants: bool,
    pub capacities: String,
    pub capacity_unit: String,
    pub lengths: String,
    pub length_unit: String,
    pub connections: String,
    /// JSONB array of `{ name, values }` custom axis definitions.
    pub custom_fields: serde_json::Value,
    pub remote_product_id: Option<String>,
    pub payment_link_url: Option<String>,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Build the generator input from this row's specification columns.
    pub fn variant_spec(&self) -> VariantSpec {
        VariantSpec {
            title: self.title.clone(),
            capacities: self.capacities.clone(),
            capacity_unit: self.capacity_unit.clone(),
            lengths: self.lengths.clone(),
            length_unit: self.length_unit.clone(),
            connections: self.connections.clone(),
            custom_fields: self.custom_field_defs(),
            pricing_mode: PricingMode::parse(&self.pricing_mode),
            base_price_cents: self.base_price_cents,
        }
    }

    /// Parse the `custom_fields` JSONB column. Malformed entries are
    /// dropped rather than rejected, matching axis-string handling.
    pub fn custom_field_defs(&self) -> Vec<CustomFieldDef> {
        serde_json::from_value(self.custom_fields.clone()).unwrap_or_default()
    }

    /// Whether any specification axis changed between two revisions.
    pub fn axes_differ(&self, other: &Product) -> bool {
        self.capacities != other.capacities
            || self.capacity_unit != other.capacity_unit
            || self.lengths != other.lengths
            || self.length_unit != other.length_unit
            || self.connections != other.connections
            || self.custom_fields != other.custom_fields
            || self.title != other.title
            || self.pricing_mode != other.pricing_mode
            || self.base_price_cents != other.base_price_cents
    }
}

/// A product enriched with its variants.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub title: String,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    pub category_id: Option<DbId>,
    pub pricing_mode: Option<String>,
    pub base_price_cents: Option<Cents>,
    pub currency: Option<String>,
    pub auto_generate_variants: Option<bool>,
    pub show_variants: Option<bool>,
    pub capacities: Option<String>,
    pub capacity_unit: Option<String>,
    pub lengths: Option<String>,
    pub length_unit: Option<String>,
    pub connections: Option<String>,
    #[serde(default)]
    pub custom_fields: Option<serde_json::Value>,
    pub remote_product_id: Option<String>,
    pub payment_link_url: Option<String>,
}

/// DTO for updating an existing product. Only non-`None` fields apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub category_id: Option<DbId>,
    pub pricing_mode: Option<String>,
    pub base_price_cents: Option<Cents>,
    pub currency: Option<String>,
    pub auto_generate_variants: Option<bool>,
    pub show_variants: Option<bool>,
    pub capacities: Option<String>,
    pub capacity_unit: Option<String>,
    pub lengths: Option<String>,
    pub length_unit: Option<String>,
    pub connections: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
    pub remote_product_id: Option<String>,
    pub payment_link_url: Option<String>,
}
