use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use rigline_api::auth::jwt::{issue_access_token, JwtConfig};
use rigline_api::config::ServerConfig;
use rigline_api::routes;
use rigline_api::state::AppState;
use rigline_payments::config::{LemonSqueezyConfig, PaymentsConfig, StripeConfig};
use rigline_payments::LemonSqueezyClient;

/// JWT secret shared by test config and test tokens.
const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Payments configuration with no webhook secrets (verification is
/// skipped, as in development mode).
pub fn test_payments_config() -> PaymentsConfig {
    PaymentsConfig {
        lemonsqueezy: LemonSqueezyConfig {
            api_key: "test-api-key".to_string(),
            store_id: "1".to_string(),
            webhook_secret: None,
        },
        stripe: StripeConfig {
            webhook_secret: None,
        },
    }
}

/// Payments configuration with both webhook secrets set, for the
/// signature rejection tests.
pub fn test_payments_config_with_secrets(secret: &str) -> PaymentsConfig {
    PaymentsConfig {
        lemonsqueezy: LemonSqueezyConfig {
            api_key: "test-api-key".to_string(),
            store_id: "1".to_string(),
            webhook_secret: Some(secret.to_string()),
        },
        stripe: StripeConfig {
            webhook_secret: Some(secret.to_string()),
        },
    }
}

/// Build the full application router with the production middleware
/// stack, using the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware (request ID, timeout, panic
/// recovery) that production uses. CORS and request tracing are
/// omitted; these tests do not send cross-origin requests.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_payments(pool, test_payments_config())
}

/// Like [`build_test_app`], but with explicit payments configuration.
pub fn build_test_app_with_payments(pool: PgPool, payments: PaymentsConfig) -> Router {
    let config = test_config();
    let lemonsqueezy = Arc::new(LemonSqueezyClient::new(&payments.lemonsqueezy));

    let state = AppState {
        pool,
        config: Arc::new(config),
        payments: Arc::new(payments),
        lemonsqueezy,
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::webhooks::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Bearer token accepted by the test app's auth extractor.
pub fn auth_token() -> String {
    let jwt = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    };
    issue_access_token(1, &jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with optional bearer auth and JSON body.
pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// GET without auth.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, None).await
}

/// GET with a test bearer token.
pub async fn get_auth(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, Some(&auth_token()), None).await
}

/// POST JSON with a test bearer token.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(&auth_token()), Some(body)).await
}

/// PUT JSON with a test bearer token.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::PUT, uri, Some(&auth_token()), Some(body)).await
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
