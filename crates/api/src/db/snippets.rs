//! Snippet repository and the access-scoped query builder.
//!
//! Every read goes through a [`SnippetQuery`], which couples an access
//! scope (owner or public) with the optional filter set. The scope is not
//! optional: there is no way to build a snippet query that ignores
//! ownership and visibility.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use snipvault_core::{SnippetId, TagName, UserId};

use super::{RepositoryError, tags};
use crate::models::{Snippet, Tag};

/// Default page size when the caller does not supply a limit.
pub const DEFAULT_LIMIT: i64 = 100;

/// Access scope for snippet reads.
///
/// `Owner` restricts to the caller's own snippets regardless of visibility;
/// `Public` restricts to `is_public = TRUE` regardless of caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetScope {
    Owner(UserId),
    Public,
}

/// A scoped, filtered, paginated snippet query.
///
/// All filters are conjunctive. Results are ordered by insertion (`id ASC`).
#[derive(Debug, Clone)]
pub struct SnippetQuery {
    pub scope: SnippetScope,
    pub language: Option<String>,
    pub is_public: Option<bool>,
    /// Inclusive lower bound on `created_at`.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_before: Option<DateTime<Utc>>,
    /// When non-empty, a snippet must carry ALL of these tags.
    pub tags: Vec<TagName>,
    pub offset: i64,
    pub limit: i64,
}

impl SnippetQuery {
    /// Create a query with no filters and default pagination.
    #[must_use]
    pub const fn new(scope: SnippetScope) -> Self {
        Self {
            scope,
            language: None,
            is_public: None,
            created_after: None,
            created_before: None,
            tags: Vec::new(),
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Fields to change on a snippet. Absent fields are left untouched.
///
/// A supplied tag list replaces the association set entirely; `None`
/// leaves the existing associations alone.
#[derive(Debug, Clone, Default)]
pub struct SnippetPatch {
    pub title: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<TagName>>,
}

/// Data for a new snippet.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
    pub language: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub tags: Vec<TagName>,
}

const SELECT_COLUMNS: &str =
    "SELECT s.id, s.title, s.code, s.language, s.description, s.is_public, \
     s.user_id, s.created_at, s.updated_at FROM snippets s";

/// Append the scope predicate. Always the first condition after WHERE.
fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, scope: SnippetScope) {
    match scope {
        SnippetScope::Owner(user_id) => {
            builder.push(" WHERE s.user_id = ");
            builder.push_bind(user_id.as_i32());
        }
        SnippetScope::Public => {
            builder.push(" WHERE s.is_public = TRUE");
        }
    }
}

/// Append the conjunctive multi-tag predicate: the snippet must be
/// associated with every supplied tag name.
fn push_tag_filter(builder: &mut QueryBuilder<'_, Postgres>, tag_names: &[TagName]) {
    builder.push(
        " AND s.id IN (SELECT st.snippet_id FROM snippet_tags st \
         JOIN tags t ON t.id = st.tag_id WHERE t.name IN (",
    );
    let mut separated = builder.separated(", ");
    for name in tag_names {
        separated.push_bind(name.as_str().to_owned());
    }
    builder.push(") GROUP BY st.snippet_id HAVING COUNT(DISTINCT t.name) = ");
    // Names are normalized and deduplicated upstream, so the count of
    // distinct matched names must equal the number supplied.
    builder.push_bind(i64::try_from(tag_names.len()).unwrap_or(i64::MAX));
    builder.push(")");
}

/// Assemble the list query for a [`SnippetQuery`].
fn build_list_query(query: &SnippetQuery) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_COLUMNS);

    push_scope(&mut builder, query.scope);

    if let Some(language) = &query.language {
        builder.push(" AND s.language = ");
        builder.push_bind(language.clone());
    }

    if let Some(is_public) = query.is_public {
        builder.push(" AND s.is_public = ");
        builder.push_bind(is_public);
    }

    if let Some(after) = query.created_after {
        builder.push(" AND s.created_at >= ");
        builder.push_bind(after);
    }

    if let Some(before) = query.created_before {
        builder.push(" AND s.created_at <= ");
        builder.push_bind(before);
    }

    if !query.tags.is_empty() {
        push_tag_filter(&mut builder, &query.tags);
    }

    builder.push(" ORDER BY s.id ASC LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset);

    builder
}

/// Assemble the single-row fetch for an ID under a scope.
fn build_get_query(scope: SnippetScope, id: SnippetId) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_COLUMNS);
    push_scope(&mut builder, scope);
    builder.push(" AND s.id = ");
    builder.push_bind(id.as_i32());
    builder
}

/// Assemble the dynamic UPDATE for a patch. Only supplied fields appear
/// in the SET list; `updated_at` is always stamped. The WHERE clause
/// scopes on both the ID and the owner, so an unowned row never matches.
fn build_update_query(
    user_id: UserId,
    id: SnippetId,
    patch: &SnippetPatch,
) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("UPDATE snippets SET updated_at = now()");

    if let Some(title) = &patch.title {
        builder.push(", title = ");
        builder.push_bind(title.clone());
    }
    if let Some(code) = &patch.code {
        builder.push(", code = ");
        builder.push_bind(code.clone());
    }
    if let Some(language) = &patch.language {
        builder.push(", language = ");
        builder.push_bind(language.clone());
    }
    if let Some(description) = &patch.description {
        builder.push(", description = ");
        builder.push_bind(description.clone());
    }
    if let Some(is_public) = patch.is_public {
        builder.push(", is_public = ");
        builder.push_bind(is_public);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id.as_i32());
    builder.push(" AND user_id = ");
    builder.push_bind(user_id.as_i32());
    builder.push(
        " RETURNING id, title, code, language, description, is_public, \
         user_id, created_at, updated_at",
    );

    builder
}

/// Repository for snippet database operations.
pub struct SnippetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SnippetRepository<'a> {
    /// Create a new snippet repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List snippets matching a scoped query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &SnippetQuery) -> Result<Vec<Snippet>, RepositoryError> {
        let mut builder = build_list_query(query);
        let snippets = builder
            .build_query_as::<Snippet>()
            .fetch_all(self.pool)
            .await?;

        Ok(snippets)
    }

    /// Fetch a single snippet by ID under a scope.
    ///
    /// Returns `None` both when the snippet does not exist and when it
    /// exists outside the scope; callers cannot tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        scope: SnippetScope,
        id: SnippetId,
    ) -> Result<Option<Snippet>, RepositoryError> {
        let mut builder = build_get_query(scope, id);
        let snippet = builder
            .build_query_as::<Snippet>()
            .fetch_optional(self.pool)
            .await?;

        Ok(snippet)
    }

    /// Create a snippet, resolving and associating its tags in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(
        &self,
        user_id: UserId,
        new: &NewSnippet,
    ) -> Result<(Snippet, Vec<Tag>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let snippet = sqlx::query_as::<_, Snippet>(
            r"
            INSERT INTO snippets (title, code, language, description, is_public, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, code, language, description, is_public,
                      user_id, created_at, updated_at
            ",
        )
        .bind(&new.title)
        .bind(&new.code)
        .bind(&new.language)
        .bind(&new.description)
        .bind(new.is_public)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let resolved = tags::upsert_all(&mut *tx, &new.tags).await?;
        tags::set_snippet_tags(&mut *tx, snippet.id, &resolved).await?;


        tx.commit().await?;

        Ok((snippet, resolved))
    }

    /// Apply a patch to an owned snippet.
    ///
    /// Only supplied fields change; a supplied tag list replaces the
    /// association set entirely. Returns `None` when the snippet does not
    /// exist or is not owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn update(
        &self,
        user_id: UserId,
        id: SnippetId,
        patch: &SnippetPatch,
    ) -> Result<Option<(Snippet, Vec<Tag>)>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut builder = build_update_query(user_id, id, patch);

        let Some(snippet) = builder
            .build_query_as::<Snippet>()
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let resolved = if let Some(tag_names) = &patch.tags {
            let resolved = tags::upsert_all(&mut *tx, tag_names).await?;
            tags::set_snippet_tags(&mut *tx, snippet.id, &resolved).await?;
            resolved
        } else {
            sqlx::query_as::<_, Tag>(
                r"
                SELECT t.id, t.name, t.created_at
                FROM tags t
                JOIN snippet_tags st ON st.tag_id = t.id
                WHERE st.snippet_id = $1
                ORDER BY t.id ASC
                ",
            )
            .bind(snippet.id)
            .fetch_all(&mut *tx)
            .await?
        };

        tx.commit().await?;

        Ok(Some((snippet, resolved)))
    }

    /// Flip the `is_public` flag on an owned snippet.
    ///
    /// Returns `None` when the snippet does not exist or is not owned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn toggle_public(
        &self,
        user_id: UserId,
        id: SnippetId,
    ) -> Result<Option<Snippet>, RepositoryError> {
        let snippet = sqlx::query_as::<_, Snippet>(
            r"
            UPDATE snippets
            SET is_public = NOT is_public, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, code, language, description, is_public,
                      user_id, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(snippet)
    }

    /// Delete an owned snippet and its tag associations. Tag rows survive.
    ///
    /// # Returns
    ///
    /// Returns `true` if the snippet was deleted, `false` if it didn't
    /// exist or wasn't owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn delete(&self, user_id: UserId, id: SnippetId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM snippet_tags
            WHERE snippet_id = $1
              AND EXISTS (SELECT 1 FROM snippets WHERE id = $1 AND user_id = $2)
            ",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM snippets WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn owner_query() -> SnippetQuery {
        SnippetQuery::new(SnippetScope::Owner(UserId::new(7)))
    }

    #[test]
    fn test_owner_scope_restricts_to_owner() {
        let sql = build_list_query(&owner_query()).into_sql();
        assert!(sql.contains("WHERE s.user_id = $1"));
        assert!(!sql.contains("is_public"));
    }

    #[test]
    fn test_public_scope_restricts_to_public() {
        let query = SnippetQuery::new(SnippetScope::Public);
        let sql = build_list_query(&query).into_sql();
        assert!(sql.contains("WHERE s.is_public = TRUE"));
        assert!(!sql.contains("user_id ="));
    }

    #[test]
    fn test_no_filters_only_scope_and_pagination() {
        let sql = build_list_query(&owner_query()).into_sql();
        assert!(!sql.contains("language"));
        assert!(!sql.contains("created_at >="));
        assert!(!sql.contains("created_at <="));
        assert!(!sql.contains("snippet_tags"));
        assert!(sql.ends_with("ORDER BY s.id ASC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_language_filter_is_conjunctive() {
        let mut query = owner_query();
        query.language = Some("python".to_owned());
        let sql = build_list_query(&query).into_sql();
        assert!(sql.contains("AND s.language = $2"));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let mut query = owner_query();
        query.created_after = Some(Utc::now());
        query.created_before = Some(Utc::now());
        let sql = build_list_query(&query).into_sql();
        assert!(sql.contains("s.created_at >= $2"));
        assert!(sql.contains("s.created_at <= $3"));
    }

    #[test]
    fn test_tag_filter_requires_all_tags() {
        let mut query = SnippetQuery::new(SnippetScope::Public);
        query.tags = vec![
            TagName::parse("rust").unwrap(),
            TagName::parse("web").unwrap(),
        ];
        let sql = build_list_query(&query).into_sql();
        // Two bound names plus the distinct-count bind
        assert!(sql.contains("t.name IN ($1, $2)"));
        assert!(sql.contains("HAVING COUNT(DISTINCT t.name) = $3"));
    }

    #[test]
    fn test_all_filters_compose() {
        let mut query = owner_query();
        query.language = Some("python".to_owned());
        query.is_public = Some(false);
        query.created_after = Some(Utc::now());
        query.created_before = Some(Utc::now());
        query.tags = vec![TagName::parse("py").unwrap()];
        query.offset = 5;
        query.limit = 10;

        let sql = build_list_query(&query).into_sql();
        assert!(sql.contains("WHERE s.user_id = $1"));
        assert!(sql.contains("AND s.language = $2"));
        assert!(sql.contains("AND s.is_public = $3"));
        assert!(sql.contains("s.created_at >= $4"));
        assert!(sql.contains("s.created_at <= $5"));
        assert!(sql.contains("t.name IN ($6)"));
        assert!(sql.contains("HAVING COUNT(DISTINCT t.name) = $7"));
        assert!(sql.ends_with("ORDER BY s.id ASC LIMIT $8 OFFSET $9"));
    }

    #[test]
    fn test_get_query_scopes_the_id_lookup() {
        let sql = build_get_query(SnippetScope::Public, SnippetId::new(3)).into_sql();
        assert!(sql.contains("WHERE s.is_public = TRUE AND s.id = $1"));

        let sql = build_get_query(SnippetScope::Owner(UserId::new(1)), SnippetId::new(3)).into_sql();
        assert!(sql.contains("WHERE s.user_id = $1 AND s.id = $2"));
    }

    #[test]
    fn test_update_query_only_sets_supplied_fields() {
        let patch = SnippetPatch {
            title: Some("new title".to_owned()),
            is_public: Some(true),
            ..Default::default()
        };
        let sql = build_update_query(UserId::new(7), SnippetId::new(3), &patch).into_sql();
        assert!(sql.contains(", title = $1"));
        assert!(sql.contains(", is_public = $2"));
        assert!(!sql.contains("code ="));
        assert!(!sql.contains("language ="));
        assert!(!sql.contains("description ="));
    }

    #[test]
    fn test_update_query_always_stamps_updated_at_and_scopes_ownership() {
        let sql =
            build_update_query(UserId::new(7), SnippetId::new(3), &SnippetPatch::default())
                .into_sql();
        assert!(sql.starts_with("UPDATE snippets SET updated_at = now()"));
        assert!(sql.contains("WHERE id = $1 AND user_id = $2"));
    }

    #[test]
    fn test_update_query_full_patch_binds_every_field() {
        let patch = SnippetPatch {
            title: Some("t".to_owned()),
            code: Some("c".to_owned()),
            language: Some("rust".to_owned()),
            description: Some("d".to_owned()),
            is_public: Some(false),
            tags: None,
        };
        let sql = build_update_query(UserId::new(1), SnippetId::new(2), &patch).into_sql();
        assert!(sql.contains(", title = $1"));
        assert!(sql.contains(", code = $2"));
        assert!(sql.contains(", language = $3"));
        assert!(sql.contains(", description = $4"));
        assert!(sql.contains(", is_public = $5"));
        assert!(sql.contains("WHERE id = $6 AND user_id = $7"));
    }

    #[test]
    fn test_default_pagination() {
        let query = owner_query();
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.offset, 0);
    }
}
