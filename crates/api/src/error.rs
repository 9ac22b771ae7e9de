use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rigline_core::error::CoreError;
use rigline_payments::PaymentsError;
use serde_json::json;

/// Error type returned by every HTTP handler.
///
/// Wraps the domain, database, and payment-provider error types and
/// renders them all as the same `{ "error": ..., "code": ... }` JSON
/// envelope the admin frontend expects.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Payments(#[from] PaymentsError),

    /// A resource addressed by something other than a numeric id
    /// (e.g. a slug) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Handler return type alias.
pub type AppResult<T> = Result<T, AppError>;

/// What a response is built from: status, stable machine code, message.
type ErrorParts = (StatusCode, &'static str, String);

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => sqlx_parts(err),
            AppError::Payments(err) => payments_parts(err),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

/// 500 with a sanitized message; the detail goes to the log, never to
/// the client.
fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// `RowNotFound` is a 404; a PostgreSQL unique violation (23505) on one
/// of our `uq_`-named constraints is a 409; anything else is a logged
/// 500.
fn sqlx_parts(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            let constraint = db_err.constraint().unwrap_or_default();
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("A record with this value already exists ({constraint})"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Provider-side failures are 502 (the upstream misbehaved); a product
/// that simply is not linked yet is the admin's 400 to fix.
fn payments_parts(err: &PaymentsError) -> ErrorParts {
    match err {
        PaymentsError::ProductNotLinked(msg) => {
            (StatusCode::BAD_REQUEST, "NOT_LINKED", msg.clone())
        }
        PaymentsError::Api { status, body } => {
            tracing::error!(status, body = %body, "Provider API error");
            (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                format!("Payment provider rejected the request ({status}): {body}"),
            )
        }
        PaymentsError::Request(e) => {
            tracing::error!(error = %e, "Provider request failed");
            (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                format!("Payment provider unreachable: {e}"),
            )
        }
        PaymentsError::PaginationOverflow { max_pages } => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_ERROR",
            format!("Provider variant listing exceeded {max_pages} pages"),
        ),
        PaymentsError::Database(e) => sqlx_parts(e),
    }
}
