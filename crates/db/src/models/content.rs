//! Typed rich-content blocks.
//!
//! Products, blogs, and services store their long-form content as an
//! ordered JSONB array of these blocks. The enum is internally tagged
//! so payloads read naturally: `{ "kind": "paragraph", "text": "..." }`.

use serde::{Deserialize, Serialize};

/// One block in a rich-content document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Image { url: String, alt: Option<String> },
    List { items: Vec<String> },
    Quote { text: String },
}

/// Parse a JSONB content column into typed blocks.
///
/// Unknown or malformed block arrays deserialize to an error the
/// caller can surface as a validation failure.
pub fn parse_blocks(value: &serde_json::Value) -> Result<Vec<ContentBlock>, serde_json::Error> {
    serde_json::from_value(value.clone())
}
