use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rigline_api::config::ServerConfig;
use rigline_api::routes;
use rigline_api::state::AppState;
use rigline_payments::{LemonSqueezyClient, PaymentsConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    // --- Configuration ---
    // Provider credentials are checked here, at startup, so a missing
    // API key is a loud boot failure rather than a broken sync later.
    let config = ServerConfig::from_env();
    let payments = PaymentsConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        store_id = %payments.lemonsqueezy.store_id,
        stripe_webhooks_verified = payments.stripe.webhook_secret.is_some(),
        lemonsqueezy_webhooks_verified = payments.lemonsqueezy.webhook_secret.is_some(),
        "Configuration loaded"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = rigline_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    rigline_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    rigline_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready (pool, health check, migrations)");

    // --- App state ---
    let state = AppState {
        pool,
        lemonsqueezy: Arc::new(LemonSqueezyClient::new(&payments.lemonsqueezy)),
        payments: Arc::new(payments),
        config: Arc::new(config.clone()),
    };

    let app = build_app(state, &config);

    // --- Serve until SIGINT/SIGTERM ---
    let addr = config.bind_addr();
    tracing::info!(%addr, "Rigline admin API listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Env-filtered console tracing; `RUST_LOG` overrides the default.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rigline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Assemble the router and its middleware stack.
///
/// Health and webhooks live at the root: providers post unauthenticated
/// (signature-verified) payloads and must not hit the bearer-token
/// layer. Everything else is under `/api/v1`.
fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::webhooks::router())
        .nest("/api/v1", routes::api_routes())
        // Middleware, applied bottom-up: panics become 500s, slow
        // handlers are cut off, and every request carries an id
        // through the trace span and back out in the response.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(config))
        .with_state(state)
}

/// CORS for the admin frontend. An unparseable origin aborts startup;
/// silently dropping one would lock the admin out with no explanation.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Resolve on SIGINT or, on Unix, SIGTERM, so both an interactive ^C
/// and a process manager stop cleanly.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
