//! Webhook payload verification and event normalization.
//!
//! Both providers deliver signed JSON over HTTP POST. Payloads are
//! verified against the raw body, then normalized into a
//! [`PaymentEvent`] so ingestion is provider-agnostic. Unrecognized
//! event kinds normalize to [`PaymentEvent::Ignored`] and are
//! acknowledged without processing.

use serde::Serialize;

use rigline_core::signature::{verify_hex_signature, verify_stripe_signature};
use rigline_core::types::{Cents, DbId};

/// Which provider delivered a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Stripe,
    LemonSqueezy,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Stripe => "stripe",
            Provider::LemonSqueezy => "lemonsqueezy",
        }
    }
}

/// A checkout-completed event, normalized across providers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutEvent {
    /// Provider checkout-session identifier (idempotency key).
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total_cents: Cents,
    pub currency: String,
    /// Line-item description, used for fuzzy product resolution.
    pub description: Option<String>,
    /// Explicit product slug from event metadata, when present.
    pub product_slug: Option<String>,
    /// Explicit local variant id from event metadata, when present.
    pub variant_id: Option<DbId>,
    /// Payment-link identifier, matched against stored payment links.
    pub payment_link: Option<String>,
    /// Metadata attribute fields used to synthesize a variant display
    /// name when no explicit variant id is present.
    pub capacity: Option<String>,
    pub length: Option<String>,
    pub end_connection: Option<String>,
    pub quantity: i32,
}

/// A provider event after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEvent {
    CheckoutCompleted(CheckoutEvent),
    /// Payment confirmed for an existing order (no line items carried).
    PaymentSucceeded { payment_intent_id: String },
    /// A charge was refunded; locates the order by payment intent.
    ChargeRefunded { payment_intent_id: String },
    /// Recognized as a webhook but not a kind we process.
    Ignored { kind: String },
}

/// Verify a webhook's signature for the given provider.
///
/// When no secret is configured, verification is skipped (development
/// mode). Once a secret is set, a missing or mismatched signature
/// rejects the payload outright; there is no fallback processing of
/// unverified payloads.
pub fn verify(provider: Provider, secret: Option<&str>, body: &str, header: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return true;
    };
    let Some(header) = header else {
        return false;
    };
    match provider {
        Provider::Stripe => verify_stripe_signature(secret, body, header),
        Provider::LemonSqueezy => verify_hex_signature(secret, body, header),
    }
}

/// Name of the signature header each provider sends.
pub fn signature_header(provider: Provider) -> &'static str {
    match provider {
        Provider::Stripe => "stripe-signature",
        Provider::LemonSqueezy => "x-signature",
    }
}

// ---------------------------------------------------------------------------
// Stripe
// ---------------------------------------------------------------------------

/// Normalize a Stripe event payload.
///
/// Recognized types: `checkout.session.completed`,
/// `payment_intent.succeeded`, `charge.refunded`.
pub fn parse_stripe_event(payload: &serde_json::Value) -> PaymentEvent {
    let kind = payload["type"].as_str().unwrap_or_default();
    let object = &payload["data"]["object"];

    match kind {
        "checkout.session.completed" => {
            let metadata = &object["metadata"];
            PaymentEvent::CheckoutCompleted(CheckoutEvent {
                session_id: object["id"].as_str().unwrap_or_default().to_string(),
                payment_intent_id: object["payment_intent"].as_str().map(str::to_string),
                customer_name: object["customer_details"]["name"]
                    .as_str()
                    .map(str::to_string),
                customer_email: object["customer_details"]["email"]
                    .as_str()
                    .map(str::to_string),
                total_cents: object["amount_total"].as_i64().unwrap_or(0),
                currency: object["currency"].as_str().unwrap_or("usd").to_string(),
                description: object["description"]
                    .as_str()
                    .or_else(|| metadata["description"].as_str())
                    .map(str::to_string),
                product_slug: metadata["product_slug"].as_str().map(str::to_string),
                variant_id: metadata["variant_id"]
                    .as_str()
                    .and_then(|v| v.parse::<DbId>().ok()),
                payment_link: object["payment_link"].as_str().map(str::to_string),
                capacity: metadata["capacity"].as_str().map(str::to_string),
                length: metadata["length"].as_str().map(str::to_string),
                end_connection: metadata["end_connection"].as_str().map(str::to_string),
                quantity: 1,
            })
        }
        "payment_intent.succeeded" => PaymentEvent::PaymentSucceeded {
            payment_intent_id: object["id"].as_str().unwrap_or_default().to_string(),
        },
        "charge.refunded" => PaymentEvent::ChargeRefunded {
            payment_intent_id: object["payment_intent"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        },
        other => PaymentEvent::Ignored {
            kind: other.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Lemon Squeezy
// ---------------------------------------------------------------------------

/// Normalize a Lemon Squeezy event payload.
///
/// Recognized event names: `order_created` (checkout completed) and
/// `order_refunded`.
pub fn parse_lemonsqueezy_event(payload: &serde_json::Value) -> PaymentEvent {
    let kind = payload["meta"]["event_name"].as_str().unwrap_or_default();
    let attributes = &payload["data"]["attributes"];
    let custom = &payload["meta"]["custom_data"];

    match kind {
        "order_created" => {
            let first_item = &attributes["first_order_item"];
            // The order identifier doubles as the payment reference;
            // the provider has no separate intent object.
            let identifier = attributes["identifier"]
                .as_str()
                .or_else(|| payload["data"]["id"].as_str())
                .unwrap_or_default()
                .to_string();
            PaymentEvent::CheckoutCompleted(CheckoutEvent {
                session_id: identifier.clone(),
                payment_intent_id: Some(identifier),
                customer_name: attributes["user_name"].as_str().map(str::to_string),
                customer_email: attributes["user_email"].as_str().map(str::to_string),
                total_cents: attributes["total"].as_i64().unwrap_or(0),
                currency: attributes["currency"].as_str().unwrap_or("usd").to_string(),
                description: first_item["product_name"]
                    .as_str()
                    .map(str::to_string),
                product_slug: custom["product_slug"].as_str().map(str::to_string),
                variant_id: custom["variant_id"]
                    .as_str()
                    .and_then(|v| v.parse::<DbId>().ok()),
                payment_link: custom["payment_link"].as_str().map(str::to_string),
                capacity: custom["capacity"].as_str().map(str::to_string),
                length: custom["length"].as_str().map(str::to_string),
                end_connection: custom["end_connection"].as_str().map(str::to_string),
                quantity: first_item["quantity"].as_i64().unwrap_or(1) as i32,
            })
        }
        "order_refunded" => PaymentEvent::ChargeRefunded {
            payment_intent_id: attributes["identifier"]
                .as_str()
                .or_else(|| payload["data"]["id"].as_str())
                .unwrap_or_default()
                .to_string(),
        },
        other => PaymentEvent::Ignored {
            kind: other.to_string(),
        },
    }
}
