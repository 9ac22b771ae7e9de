use std::net::SocketAddr;

use crate::auth::jwt::JwtConfig;

/// HTTP server settings loaded from the environment.
///
/// Everything here has a development-friendly default; only the JWT
/// secret (and the provider credentials loaded elsewhere) are required.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Origins the admin frontend may call from.
    pub cors_origins: Vec<String>,
    /// Per-request timeout enforced by the middleware stack.
    pub request_timeout_secs: u64,
    /// Access-token signing configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read the server configuration.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    ///
    /// `CORS_ORIGINS` is comma-separated; blank entries are dropped.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
        }
    }

    /// The socket address to bind, panicking on an unparseable `HOST`.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse()
            .unwrap_or_else(|e| panic!("Invalid HOST address '{}': {e}", self.host));
        SocketAddr::new(ip, self.port)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid value: {e}")),
        Err(_) => default,
    }
}
