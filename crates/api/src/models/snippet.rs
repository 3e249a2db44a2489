//! Snippet model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use snipvault_core::{SnippetId, UserId};

use super::Tag;

/// A stored code snippet.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub code: String,
    pub language: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A snippet together with its associated tags, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetWithTags {
    #[serde(flatten)]
    pub snippet: Snippet,
    pub tags: Vec<Tag>,
}
