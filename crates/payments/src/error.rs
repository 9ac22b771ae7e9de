use thiserror::Error;

/// Errors from the payment-provider integration layer.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, surfaced to the caller.
        body: String,
    },

    /// The product is not linked to a remote provider product yet.
    /// Surfaced with guidance instead of a partial sync result.
    #[error("{0}")]
    ProductNotLinked(String),

    /// The paginated listing exceeded the defensive page cap; treated
    /// as a misbehaving provider rather than looping forever.
    #[error("Provider pagination exceeded {max_pages} pages; aborting")]
    PaginationOverflow { max_pages: u32 },

    /// A database error during sync or ingestion writes.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
