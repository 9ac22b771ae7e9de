//! Domain error type shared by every layer of the workspace.

use crate::types::DbId;

/// Errors raised by domain logic, independent of HTTP and storage
/// concerns. The API layer maps each variant onto a status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A lookup by primary key found nothing.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input violated a domain rule.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request contradicts current state, e.g. an illegal order
    /// status move or a duplicate slug.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or unusable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A condition that indicates a bug rather than bad input.
    #[error("Internal error: {0}")]
    Internal(String),
}
