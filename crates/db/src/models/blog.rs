//! Blog post entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rigline_core::types::{DbId, Timestamp};

/// A row from the `blogs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Blog {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    /// Ordered array of typed content blocks (see [`super::content`]).
    pub content: serde_json::Value,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlog {
    pub title: String,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    pub is_published: Option<bool>,
}

/// DTO for updating a blog post. Only non-`None` fields apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<serde_json::Value>,
    pub is_published: Option<bool>,
}
