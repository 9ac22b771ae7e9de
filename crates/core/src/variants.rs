//! Product variant generation.
//!
//! Expands a product's specification axes (capacity, length, end
//! connection, and arbitrary named custom fields) into the full
//! Cartesian product of concrete variants. Each combination receives a
//! derived model number built from a short title prefix plus one
//! segment per non-empty axis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Cents;

/// Number of leading title characters used as the model number prefix.
pub const MODEL_PREFIX_LENGTH: usize = 3;

/// How generated variants are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Every variant inherits the product's base price.
    Base,
    /// Prices are set per variant (generated variants start with none).
    Variant,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::Base => "base",
            PricingMode::Variant => "variant",
        }
    }

    /// Parse a stored pricing mode string. Unknown values fall back to
    /// `Base`, matching how the admin form treats a missing selection.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "variant" => PricingMode::Variant,
            _ => PricingMode::Base,
        }
    }
}

/// A named custom specification axis, as stored on the product.
///
/// `values` is a comma-separated list, exactly as typed into the admin
/// form (e.g. `{ name: "Coating", values: "galvanized, painted" }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldDef {
    pub name: String,
    pub values: String,
}

/// The full specification a product exposes to the generator.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    /// Product title, used to derive the model number prefix.
    pub title: String,
    /// Comma-separated capacity values (e.g. `"10,20,30"`).
    pub capacities: String,
    /// Capacity unit abbreviation appended to model segments (e.g. `"tons"`).
    pub capacity_unit: String,
    /// Comma-separated length values.
    pub lengths: String,
    /// Length unit abbreviation (e.g. `"ft"`).
    pub length_unit: String,
    /// Comma-separated end-connection styles (e.g. `"hook,shackle"`).
    pub connections: String,
    /// Custom axes in their defined order.
    pub custom_fields: Vec<CustomFieldDef>,
    /// Pricing policy for generated variants.
    pub pricing_mode: PricingMode,
    /// Base price applied in [`PricingMode::Base`].
    pub base_price_cents: Option<Cents>,
}

/// One concrete variant produced by [`generate_variants`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedVariant {
    /// Derived model number, e.g. `HEA-10tons-6ft`. Only locally
    /// distinguishing within the product, not globally unique.
    pub model_number: String,
    /// Human-readable capacity with unit (`"10 tons"`), when that axis
    /// contributed to this variant.
    pub capacity: Option<String>,
    /// Human-readable length with unit (`"6 ft"`).
    pub length: Option<String>,
    /// End connection style, verbatim axis value.
    pub end_connection: Option<String>,
    /// Custom field name → value for this combination.
    pub custom_values: BTreeMap<String, String>,
    /// Price in cents, per the pricing policy.
    pub price_cents: Option<Cents>,
}

/// Split a comma-separated axis string into trimmed, non-empty values.
///
/// Malformed entries (empty after trim) are silently dropped rather
/// than rejected.
pub fn parse_axis(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive the uppercase model number prefix from a product title.
///
/// Takes the first [`MODEL_PREFIX_LENGTH`] characters of the trimmed
/// title. A shorter title yields a shorter prefix; this is not an
/// error.
pub fn title_prefix(title: &str) -> String {
    title
        .trim()
        .chars()
        .take(MODEL_PREFIX_LENGTH)
        .collect::<String>()
        .to_uppercase()
}

/// Expand a specification into the n-ary Cartesian product of its
/// non-empty axes.
///
/// Axis order is fixed: capacity, length, connection, then custom
/// fields in their defined order. An omitted (empty) axis contributes
/// no dimension. If every axis is empty the result is empty — there is
/// no implicit "one variant with no attributes".
///
/// Model number segments: capacity and length append the unit
/// abbreviation directly to the value (`30tons`), while the stored
/// display attribute keeps a space (`30 tons`). Connection and custom
/// segments use the raw value.
pub fn generate_variants(spec: &VariantSpec) -> Vec<GeneratedVariant> {
    let prefix = title_prefix(&spec.title);

    let capacities = parse_axis(&spec.capacities);
    let lengths = parse_axis(&spec.lengths);
    let connections = parse_axis(&spec.connections);
    let custom_axes: Vec<(&str, Vec<String>)> = spec
        .custom_fields
        .iter()
        .map(|f| (f.name.as_str(), parse_axis(&f.values)))
        .filter(|(_, values)| !values.is_empty())
        .collect();

    if capacities.is_empty()
        && lengths.is_empty()
        && connections.is_empty()
        && custom_axes.is_empty()
    {
        return Vec::new();
    }

    let mut combos = vec![GeneratedVariant {
        model_number: prefix,
        capacity: None,
        length: None,
        end_connection: None,
        custom_values: BTreeMap::new(),
        price_cents: match spec.pricing_mode {
            PricingMode::Base => spec.base_price_cents,
            PricingMode::Variant => None,
        },
    }];

    if !capacities.is_empty() {
        combos = expand(combos, &capacities, |variant, value| {
            append_segment(
                &mut variant.model_number,
                &format!("{value}{}", spec.capacity_unit),
            );
            variant.capacity = Some(format!("{value} {}", spec.capacity_unit));
        });
    }

    if !lengths.is_empty() {
        combos = expand(combos, &lengths, |variant, value| {
            append_segment(
                &mut variant.model_number,
                &format!("{value}{}", spec.length_unit),
            );
            variant.length = Some(format!("{value} {}", spec.length_unit));
        });
    }

    if !connections.is_empty() {
        combos = expand(combos, &connections, |variant, value| {
            append_segment(&mut variant.model_number, value);
            variant.end_connection = Some(value.to_string());
        });
    }

    for (name, values) in &custom_axes {
        combos = expand(combos, values, |variant, value| {
            append_segment(&mut variant.model_number, value);
            variant
                .custom_values
                .insert(name.to_string(), value.to_string());
        });
    }

    combos
}

/// Multiply the current combination set by one axis.
fn expand<F>(combos: Vec<GeneratedVariant>, values: &[String], apply: F) -> Vec<GeneratedVariant>
where
    F: Fn(&mut GeneratedVariant, &str),
{
    let mut next = Vec::with_capacity(combos.len() * values.len());
    for combo in &combos {
        for value in values {
            let mut variant = combo.clone();
            apply(&mut variant, value);
            next.push(variant);
        }
    }
    next
}

fn append_segment(model_number: &mut String, segment: &str) {
    model_number.push('-');
    model_number.push_str(segment);
}
