//! Service page entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rigline_core::types::{DbId, Timestamp};

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Ordered array of typed content blocks (see [`super::content`]).
    pub content: serde_json::Value,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new service page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub title: String,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a service page. Only non-`None` fields apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
