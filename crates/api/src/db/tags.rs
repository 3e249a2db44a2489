//! Tag repository: lookup, strict creation, and idempotent upsert.
//!
//! Tag names arrive pre-normalized as [`TagName`]; the unique index on
//! `tags.name` therefore enforces case-insensitive uniqueness. Concurrent
//! creation of the same new tag is handled with a single
//! `INSERT ... ON CONFLICT` upsert rather than a check-then-insert race.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};

use snipvault_core::{SnippetId, TagName};

use super::RepositoryError;
use crate::models::Tag;

/// Repository for tag database operations.
pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tags ordered by insertion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            r"
            SELECT id, name, created_at
            FROM tags
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Create a tag, failing if the normalized name already exists.
    ///
    /// Used by the direct tag-creation endpoint, where re-creating an
    /// existing tag is reported as a conflict.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &TagName) -> Result<Tag, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            r"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name, created_at
            ",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!("tag '{name}' already exists"));
            }
            RepositoryError::Database(e)
        })?;

        Ok(tag)
    }

    /// Get the tags associated with a snippet, ordered by insertion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_snippet(&self, snippet_id: SnippetId) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            r"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            JOIN snippet_tags st ON st.tag_id = t.id
            WHERE st.snippet_id = $1
            ORDER BY t.id ASC
            ",
        )
        .bind(snippet_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Get the tags for a set of snippets in one query, keyed by snippet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_snippets(
        &self,
        snippet_ids: &[SnippetId],
    ) -> Result<HashMap<SnippetId, Vec<Tag>>, RepositoryError> {
        if snippet_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = snippet_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, SnippetTagRow>(
            r"
            SELECT st.snippet_id, t.id, t.name, t.created_at
            FROM tags t
            JOIN snippet_tags st ON st.tag_id = t.id
            WHERE st.snippet_id = ANY($1)
            ORDER BY st.snippet_id ASC, t.id ASC
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_snippet: HashMap<SnippetId, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_snippet.entry(row.snippet_id).or_default().push(Tag {
                id: row.id,
                name: row.name,
                created_at: row.created_at,
            });
        }

        Ok(by_snippet)
    }
}

/// Upsert a single tag inside an open transaction.
///
/// The no-op `DO UPDATE` makes the statement return the existing row on
/// conflict, so two concurrent requests resolving the same new name both
/// observe the one surviving tag.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn upsert(conn: &mut PgConnection, name: &TagName) -> Result<Tag, RepositoryError> {
    let tag = sqlx::query_as::<_, Tag>(
        r"
        INSERT INTO tags (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name, created_at
        ",
    )
    .bind(name)
    .fetch_one(conn)
    .await?;

    Ok(tag)
}

/// Upsert every name in order and return the resolved tags.
///
/// Duplicate names in the input collapse to one tag each.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn upsert_all(
    conn: &mut PgConnection,
    names: &[TagName],
) -> Result<Vec<Tag>, RepositoryError> {
    let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
    for name in names {
        if tags.iter().any(|t| &t.name == name) {
            continue;
        }
        tags.push(upsert(conn, name).await?);
    }
    Ok(tags)
}

/// Replace a snippet's tag associations with exactly the given tags.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn set_snippet_tags(
    conn: &mut PgConnection,
    snippet_id: SnippetId,
    tags: &[Tag],
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM snippet_tags WHERE snippet_id = $1")
        .bind(snippet_id)
        .execute(&mut *conn)
        .await?;

    for tag in tags {
        sqlx::query(
            r"
            INSERT INTO snippet_tags (snippet_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(snippet_id)
        .bind(tag.id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[derive(sqlx::FromRow)]
struct SnippetTagRow {
    snippet_id: SnippetId,
    id: snipvault_core::TagId,
    name: TagName,
    created_at: chrono::DateTime<chrono::Utc>,
}
