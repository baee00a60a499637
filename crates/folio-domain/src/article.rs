//! Article records exchanged with the content API
//!
//! `content` is always the opaque Document string: canonical JSON for
//! anything written by the editor, raw markup for older articles.

use serde::{Deserialize, Serialize};

/// A stored article as returned by the content API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article identifier
    pub id: String,

    /// Title
    pub title: String,

    /// Document string (canonical or legacy)
    pub content: String,

    /// Category the article is filed under
    #[serde(default)]
    pub category_id: String,

    /// Thumbnail URL, if one was uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Creation timestamp as sent by the API
    #[serde(default)]
    pub created_at: String,
}

/// A category articles can be filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: String,

    /// Display name
    pub name: String,
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    /// Title
    pub title: String,

    /// Canonical document string, passed through verbatim
    pub content: String,

    /// Category identifier
    pub category_id: String,

    /// Thumbnail URL; empty when the article has none
    pub image_url: String,
}
