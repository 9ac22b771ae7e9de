//! Payment-provider configuration loaded from environment variables.
//!
//! API credentials are required at process start; a missing key aborts
//! startup with a descriptive message rather than failing lazily on
//! first use. Webhook secrets are optional: when absent, signature
//! verification is skipped (development mode).

/// Lemon Squeezy credentials and store identity.
#[derive(Debug, Clone)]
pub struct LemonSqueezyConfig {
    /// Bearer token for the Lemon Squeezy REST API.
    pub api_key: String,
    /// Store whose products/variants are listed.
    pub store_id: String,
    /// Webhook signing secret (`X-Signature`). `None` skips checks.
    pub webhook_secret: Option<String>,
}

/// Stripe webhook configuration. The catalog lives in Lemon Squeezy;
/// Stripe only delivers payment events here.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Webhook signing secret (`Stripe-Signature`). `None` skips checks.
    pub webhook_secret: Option<String>,
}

/// All provider configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    pub lemonsqueezy: LemonSqueezyConfig,
    pub stripe: StripeConfig,
}

impl PaymentsConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `LEMONSQUEEZY_API_KEY`       | **yes**  | --      |
    /// | `LEMONSQUEEZY_STORE_ID`      | **yes**  | --      |
    /// | `LEMONSQUEEZY_WEBHOOK_SECRET`| no       | unset   |
    /// | `STRIPE_WEBHOOK_SECRET`      | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let api_key = std::env::var("LEMONSQUEEZY_API_KEY")
            .expect("LEMONSQUEEZY_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "LEMONSQUEEZY_API_KEY must not be empty");

        let store_id = std::env::var("LEMONSQUEEZY_STORE_ID")
            .expect("LEMONSQUEEZY_STORE_ID must be set in the environment");
        assert!(!store_id.is_empty(), "LEMONSQUEEZY_STORE_ID must not be empty");

        Self {
            lemonsqueezy: LemonSqueezyConfig {
                api_key,
                store_id,
                webhook_secret: optional_env("LEMONSQUEEZY_WEBHOOK_SECRET"),
            },
            stripe: StripeConfig {
                webhook_secret: optional_env("STRIPE_WEBHOOK_SECRET"),
            },
        }
    }
}

/// Read an optional env var, treating empty values as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
