//! Bearer-token issuing and verification for the admin surface.
//!
//! There is a single token kind: a short-lived HS256 JWT handed out by
//! the login endpoint and required by every `/api/v1` route except
//! login itself. No refresh tokens; admins simply log in again.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigline_core::types::DbId;

/// Default token lifetime in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

/// Claims carried by an admin access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The admin user's internal database id.
    pub sub: DbId,
    /// Expiry as a UTC Unix timestamp.
    pub exp: i64,
    /// Issue time as a UTC Unix timestamp.
    pub iat: i64,
    /// Random token id (UUID v4), logged for audit.
    pub jti: String,
}

/// Signing secret and lifetime, loaded once at startup.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is missing or empty; a server without a
    /// signing secret must not come up.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| {
                v.parse::<i64>()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64")
            })
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Issue an access token for an admin user.
pub fn issue_access_token(
    admin_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now();
    let expires_at = issued_at + Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        sub: admin_id,
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode and verify an access token, returning its [`Claims`].
///
/// Signature and expiry are checked; any failure is a single opaque
/// error so callers can map it to one uniform 401.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}
