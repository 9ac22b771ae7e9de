//! Webhook signature verification primitives.
//!
//! Both supported providers sign webhook payloads with HMAC-SHA256 over
//! the raw request body, differing only in how the signature travels:
//! Lemon Squeezy sends the hex digest directly in `X-Signature`, Stripe
//! sends a `t=<timestamp>,v1=<digest>` header and signs
//! `"{timestamp}.{body}"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded HMAC-SHA256 of a payload.
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a bare hex HMAC signature (Lemon Squeezy style).
pub fn verify_hex_signature(secret: &str, payload: &str, signature: &str) -> bool {
    let expected = hmac_sha256_hex(secret, payload);
    constant_time_eq(expected.as_bytes(), signature.trim().to_lowercase().as_bytes())
}

/// A parsed Stripe `Stripe-Signature` header.
#[derive(Debug, PartialEq, Eq)]
pub struct StripeSignature {
    /// Unix timestamp from the `t=` element.
    pub timestamp: i64,
    /// All `v1=` signatures present in the header.
    pub signatures: Vec<String>,
}

/// Parse a `Stripe-Signature` header of the form
/// `t=1712000000,v1=abc...,v1=def...`. Unknown elements are ignored.
/// Returns `None` when the timestamp or every `v1` entry is missing.
pub fn parse_stripe_signature(header: &str) -> Option<StripeSignature> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for element in header.split(',') {
        let (key, value) = element.trim().split_once('=')?;
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    match (timestamp, signatures.is_empty()) {
        (Some(timestamp), false) => Some(StripeSignature {
            timestamp,
            signatures,
        }),
        _ => None,
    }
}

/// Verify a Stripe webhook signature header against the raw body.
///
/// The signed payload is `"{t}.{body}"`; verification succeeds if any
/// `v1` entry matches.
pub fn verify_stripe_signature(secret: &str, body: &str, header: &str) -> bool {
    let Some(parsed) = parse_stripe_signature(header) else {
        return false;
    };
    let signed_payload = format!("{}.{}", parsed.timestamp, body);
    let expected = hmac_sha256_hex(secret, &signed_payload);
    parsed
        .signatures
        .iter()
        .any(|s| constant_time_eq(expected.as_bytes(), s.trim().to_lowercase().as_bytes()))
}

/// Length-then-XOR comparison so signature checks do not short-circuit
/// on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    #[test]
    fn hmac_is_hex_sha256() {
        let sig = hmac_sha256_hex(SECRET, "payload");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hex_signature_round_trips() {
        let body = r#"{"meta":{"event_name":"order_created"}}"#;
        let sig = hmac_sha256_hex(SECRET, body);
        assert!(verify_hex_signature(SECRET, body, &sig));
    }

    #[test]
    fn hex_signature_accepts_uppercase_digest() {
        let sig = hmac_sha256_hex(SECRET, "body").to_uppercase();
        assert!(verify_hex_signature(SECRET, "body", &sig));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let sig = hmac_sha256_hex(SECRET, "body");
        assert!(!verify_hex_signature("other_secret", "body", &sig));
    }

    #[test]
    fn tampered_body_fails_verification() {
        let sig = hmac_sha256_hex(SECRET, "body");
        assert!(!verify_hex_signature(SECRET, "body2", &sig));
    }

    // -- Stripe header parsing ---------------------------------------------

    #[test]
    fn parses_stripe_header() {
        let parsed = parse_stripe_signature("t=1712000000,v1=abc123,v0=legacy").unwrap();
        assert_eq!(parsed.timestamp, 1_712_000_000);
        assert_eq!(parsed.signatures, vec!["abc123"]);
    }

    #[test]
    fn stripe_header_without_v1_is_rejected() {
        assert_eq!(parse_stripe_signature("t=1712000000,v0=legacy"), None);
        assert_eq!(parse_stripe_signature("v1=abc"), None);
        assert_eq!(parse_stripe_signature("garbage"), None);
    }

    #[test]
    fn stripe_signature_round_trips() {
        let body = r#"{"type":"checkout.session.completed"}"#;
        let timestamp = 1_712_000_000i64;
        let expected = hmac_sha256_hex(SECRET, &format!("{timestamp}.{body}"));
        let header = format!("t={timestamp},v1={expected}");

        assert!(verify_stripe_signature(SECRET, body, &header));
        assert!(!verify_stripe_signature(SECRET, "tampered", &header));
        assert!(!verify_stripe_signature("other", body, &header));
    }

    #[test]
    fn stripe_verification_accepts_any_matching_v1() {
        let body = "payload";
        let timestamp = 42i64;
        let good = hmac_sha256_hex(SECRET, &format!("{timestamp}.{body}"));
        let header = format!("t={timestamp},v1=deadbeef,v1={good}");

        assert!(verify_stripe_signature(SECRET, body, &header));
    }
}
