//! Variant price synchronizer.
//!
//! Reconciles a product's local variants against the remote provider's
//! variant records for the linked product. The remote side is
//! authoritative for prices: every established link copies the remote
//! price back locally. Matching is planned as a pure pass over the two
//! record sets, then applied as repository writes.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;

use rigline_core::matching::names_match;
use rigline_core::types::{Cents, DbId};
use rigline_db::models::product::Product;
use rigline_db::models::variant::ProductVariant;
use rigline_db::repositories::{ProductRepo, VariantRepo};

use crate::client::{LemonSqueezyClient, RemoteVariant};
use crate::error::PaymentsError;

/// Per-variant outcome of a sync pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A new link was established by name match; the remote price was
    /// copied locally.
    Linked {
        remote_variant_id: String,
        price_cents: Cents,
    },
    /// An existing link whose remote price diverged; the local price
    /// was overwritten with the remote value.
    PriceUpdated {
        remote_variant_id: String,
        previous_price_cents: Option<Cents>,
        price_cents: Cents,
    },
    /// An existing link with matching prices; nothing was written.
    AlreadyLinked,
    /// No remote counterpart was found; nothing was written.
    Unmatched { hint: String },
}

/// One local variant's sync outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSync {
    pub variant_id: DbId,
    pub model_number: String,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Aggregate counts plus per-variant detail for a completed sync.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Newly linked by name match.
    pub matched: usize,
    /// Existing links whose price was refreshed.
    pub price_updated: usize,
    /// Existing links that needed no write.
    pub already_linked: usize,
    /// Variants with no remote counterpart.
    pub unmatched: usize,
    pub variants: Vec<VariantSync>,
}

/// Recoverable "nothing to sync against" state: the remote product
/// exists but has no variants yet. Carries setup guidance instead of
/// failing.
#[derive(Debug, Clone, Serialize)]
pub struct NoRemoteVariants {
    pub dashboard_url: String,
    pub instructions: String,
}

/// Result of a sync run against one product.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncResult {
    Synced(SyncReport),
    NoRemoteVariants(NoRemoteVariants),
}

/// Synchronize one product's variants against its linked remote
/// product.
///
/// Fails fast with [`PaymentsError::ProductNotLinked`] when the
/// product carries no remote product id. A remote product with zero
/// variants is a non-error outcome carrying setup instructions.
pub async fn sync_product(
    pool: &PgPool,
    client: &LemonSqueezyClient,
    product: &Product,
) -> Result<SyncResult, PaymentsError> {
    let remote_product_id = product.remote_product_id.as_deref().ok_or_else(|| {
        PaymentsError::ProductNotLinked(format!(
            "Product '{}' has no linked Lemon Squeezy product. \
             Set its remote product id in the product settings, then sync again.",
            product.title
        ))
    })?;

    let remote = client.list_variants(remote_product_id).await?;
    tracing::info!(
        product_id = product.id,
        remote_count = remote.len(),
        "Fetched remote variants"
    );

    if remote.is_empty() {
        return Ok(SyncResult::NoRemoteVariants(NoRemoteVariants {
            dashboard_url: LemonSqueezyClient::dashboard_url(remote_product_id),
            instructions: "The linked Lemon Squeezy product has no variants yet. \
                Create one variant per model number in the dashboard, \
                then run sync again."
                .to_string(),
        }));
    }

    let local = VariantRepo::list_by_product(pool, product.id).await?;
    let outcomes = plan_sync(&local, &remote);

    let now = chrono::Utc::now();
    let mut report = SyncReport::default();

    for entry in &outcomes {
        match &entry.outcome {
            SyncOutcome::Linked {
                remote_variant_id,
                price_cents,
            } => {
                VariantRepo::mark_synced(pool, entry.variant_id, remote_variant_id, *price_cents, now)
                    .await?;
                report.matched += 1;
            }
            SyncOutcome::PriceUpdated {
                remote_variant_id,
                price_cents,
                ..
            } => {
                VariantRepo::mark_synced(pool, entry.variant_id, remote_variant_id, *price_cents, now)
                    .await?;
                report.price_updated += 1;
            }
            SyncOutcome::AlreadyLinked => report.already_linked += 1,
            SyncOutcome::Unmatched { .. } => report.unmatched += 1,
        }
    }

    ProductRepo::stamp_synced(pool, product.id, now).await?;

    tracing::info!(
        product_id = product.id,
        matched = report.matched,
        price_updated = report.price_updated,
        already_linked = report.already_linked,
        unmatched = report.unmatched,
        "Variant sync complete"
    );

    report.variants = outcomes;
    Ok(SyncResult::Synced(report))
}

/// Plan the sync pass without touching storage.
///
/// Per local variant, first match wins:
/// 1. an existing remote link is looked up by id and only compared on
///    price (name rules are never re-evaluated for linked records);
/// 2. otherwise unclaimed remote variants are searched in provider
///    order for a name match against the model number;
/// 3. otherwise the variant is unmatched. Variants with an empty model
///    number are unmatched without comparison.
fn plan_sync(local: &[ProductVariant], remote: &[RemoteVariant]) -> Vec<VariantSync> {
    // Remote ids already claimed by a local link are excluded from
    // name matching, as are ids claimed earlier in this pass.
    let mut claimed: HashSet<&str> = local
        .iter()
        .filter_map(|v| v.remote_variant_id.as_deref())
        .collect();

    let mut outcomes = Vec::with_capacity(local.len());

    for variant in local {
        let outcome = if variant.model_number.trim().is_empty() {
            SyncOutcome::Unmatched {
                hint: "Variant has no model number; regenerate variants first.".to_string(),
            }
        } else if let Some(remote_id) = variant.remote_variant_id.as_deref() {
            match remote.iter().find(|r| r.id == remote_id) {
                Some(record) if variant.price_cents == Some(record.attributes.price) => {
                    SyncOutcome::AlreadyLinked
                }
                Some(record) => SyncOutcome::PriceUpdated {
                    remote_variant_id: record.id.clone(),
                    previous_price_cents: variant.price_cents,
                    price_cents: record.attributes.price,
                },
                None => SyncOutcome::Unmatched {
                    hint: format!(
                        "Linked remote variant {remote_id} no longer exists; \
                         clear the link or recreate the variant in the dashboard."
                    ),
                },
            }
        } else {
            match remote
                .iter()
                .find(|r| !claimed.contains(r.id.as_str())
                    && names_match(&variant.model_number, &r.attributes.name))
            {
                Some(record) => {
                    claimed.insert(record.id.as_str());
                    SyncOutcome::Linked {
                        remote_variant_id: record.id.clone(),
                        price_cents: record.attributes.price,
                    }
                }
                None => SyncOutcome::Unmatched {
                    hint: format!(
                        "Create a remote variant named exactly '{}' in the dashboard.",
                        variant.model_number
                    ),
                },
            }
        };

        outcomes.push(VariantSync {
            variant_id: variant.id,
            model_number: variant.model_number.clone(),
            outcome,
        });
    }

    outcomes
}
