//! Tag model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use snipvault_core::{TagId, TagName};

/// A normalized tag. Tags are created lazily and never deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub created_at: DateTime<Utc>,
}
