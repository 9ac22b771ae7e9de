//! REST client for the Lemon Squeezy API.
//!
//! Covers exactly the operations the admin backend consumes: paginated
//! product and variant listing, and checkout creation. Variant
//! create/update/delete are not offered by the provider's API and are
//! performed manually through its dashboard; the synchronizer never
//! attempts them.

use serde::{Deserialize, Serialize};

use rigline_core::types::Cents;

use crate::config::LemonSqueezyConfig;
use crate::error::PaymentsError;

/// Base URL of the Lemon Squeezy REST API.
const API_BASE: &str = "https://api.lemonsqueezy.com/v1";

/// Provider page size cap.
pub const PAGE_SIZE: u32 = 100;

/// Defensive bound on the pagination loop. Exceeding it is treated as
/// a provider error, not an infinite listing.
pub const MAX_VARIANT_PAGES: u32 = 50;

/// Dashboard base URL for remediation deep links.
const DASHBOARD_BASE: &str = "https://app.lemonsqueezy.com/products";

/// One remote product record. Serialized back out by the admin
/// endpoint that lists the remote catalog for linking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: String,
    pub attributes: RemoteProductAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProductAttributes {
    pub name: String,
    pub status: Option<String>,
}

/// One remote variant record.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVariant {
    pub id: String,
    pub attributes: RemoteVariantAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVariantAttributes {
    pub name: String,
    /// Price in cents; the remote value is authoritative post-sync.
    pub price: Cents,
    pub status: Option<String>,
}

/// A checkout created for a remote variant.
#[derive(Debug, Clone, Deserialize)]
pub struct Checkout {
    pub id: String,
    pub attributes: CheckoutAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutAttributes {
    /// Hosted checkout URL to hand to the customer.
    pub url: String,
}

/// Pagination metadata block returned with every list response.
#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(rename = "currentPage")]
    current_page: u32,
    #[serde(rename = "lastPage")]
    last_page: u32,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    page: PageMeta,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    meta: ListMeta,
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SingleResponse<T> {
    data: T,
}

/// HTTP client for the Lemon Squeezy API, bound to one store.
pub struct LemonSqueezyClient {
    client: reqwest::Client,
    api_key: String,
    store_id: String,
}

impl LemonSqueezyClient {
    /// Create a client from loaded configuration.
    pub fn new(config: &LemonSqueezyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            store_id: config.store_id.clone(),
        }
    }

    /// Dashboard deep link for a remote product, used in remediation
    /// messages when a product has no remote variants yet.
    pub fn dashboard_url(remote_product_id: &str) -> String {
        format!("{DASHBOARD_BASE}/{remote_product_id}")
    }

    /// List every product in the store, accumulating all pages.
    pub async fn list_products(&self) -> Result<Vec<RemoteProduct>, PaymentsError> {
        let store_id = self.store_id.clone();
        self.list_all(move |page| {
            format!(
                "{API_BASE}/products?filter[store_id]={store_id}\
                 &page[number]={page}&page[size]={PAGE_SIZE}"
            )
        })
        .await
    }

    /// List every variant of a remote product, accumulating all pages.
    pub async fn list_variants(
        &self,
        remote_product_id: &str,
    ) -> Result<Vec<RemoteVariant>, PaymentsError> {
        let product_id = remote_product_id.to_string();
        self.list_all(move |page| {
            format!(
                "{API_BASE}/variants?filter[product_id]={product_id}\
                 &page[number]={page}&page[size]={PAGE_SIZE}"
            )
        })
        .await
    }

    /// Create a hosted checkout for one variant of the store.
    ///
    /// The variant must already exist remotely (created via the
    /// provider dashboard); this call only produces a checkout URL.
    pub async fn create_checkout(
        &self,
        remote_variant_id: &str,
        custom: serde_json::Value,
    ) -> Result<Checkout, PaymentsError> {
        let body = serde_json::json!({
            "data": {
                "type": "checkouts",
                "attributes": {
                    "checkout_data": { "custom": custom }
                },
                "relationships": {
                    "store": {
                        "data": { "type": "stores", "id": self.store_id }
                    },
                    "variant": {
                        "data": { "type": "variants", "id": remote_variant_id }
                    }
                }
            }
        });

        let response = self
            .client
            .post(format!("{API_BASE}/checkouts"))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/vnd.api+json")
            .header("Content-Type", "application/vnd.api+json")
            .json(&body)
            .send()
            .await?;

        let parsed: SingleResponse<Checkout> = Self::parse_response(response).await?;
        Ok(parsed.data)
    }

    // ---- private helpers ----

    /// Fetch all pages of a listing endpoint. The provider reports the
    /// last page in response metadata; iteration additionally stops at
    /// [`MAX_VARIANT_PAGES`] in case the provider misreports.
    async fn list_all<T, F>(&self, url_for_page: F) -> Result<Vec<T>, PaymentsError>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(u32) -> String,
    {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            if page > MAX_VARIANT_PAGES {
                return Err(PaymentsError::PaginationOverflow {
                    max_pages: MAX_VARIANT_PAGES,
                });
            }

            let response = self
                .client
                .get(url_for_page(page))
                .bearer_auth(&self.api_key)
                .header("Accept", "application/vnd.api+json")
                .send()
                .await?;

            let parsed: ListResponse<T> = Self::parse_response(response).await?;
            records.extend(parsed.data);

            if parsed.meta.page.current_page >= parsed.meta.page.last_page {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`PaymentsError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PaymentsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PaymentsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentsError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
