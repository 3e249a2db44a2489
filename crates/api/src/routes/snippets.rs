//! Owner-scoped snippet CRUD.
//!
//! Every handler here runs under [`RequireAuth`] and scopes its queries to
//! the caller, so one user can never read or modify another user's
//! snippets through these routes. A snippet that exists but belongs to
//! someone else is reported as 404, indistinguishable from one that does
//! not exist.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;

use snipvault_core::{SnippetId, TagName};

use crate::db::{NewSnippet, SnippetPatch, SnippetRepository, SnippetScope, TagRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Snippet, SnippetWithTags, Tag};
use crate::routes::params::SnippetListParams;
use crate::state::AppState;

/// Snippet creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateSnippetRequest {
    pub title: String,
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Snippet update payload. Absent fields are left untouched; a supplied
/// tag list replaces the association set entirely.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/snippets/", get(list_snippets).post(create_snippet))
        .route(
            "/snippets/{id}",
            get(get_snippet).put(update_snippet).delete(delete_snippet),
        )
        .route("/snippets/{id}/toggle-public", patch(toggle_public))
}

/// Parse raw tag strings into normalized names, rejecting invalid ones.
pub(crate) fn parse_tag_names(raw: &[String]) -> Result<Vec<TagName>> {
    raw.iter()
        .map(|name| {
            TagName::parse(name).map_err(|e| AppError::Validation(format!("tag: {e}")))
        })
        .collect()
}

/// Attach each snippet's tags, preserving snippet order.
pub(crate) async fn with_tags(
    tags: &TagRepository<'_>,
    snippets: Vec<Snippet>,
) -> Result<Vec<SnippetWithTags>> {
    let ids: Vec<SnippetId> = snippets.iter().map(|s| s.id).collect();
    let mut by_snippet = tags.for_snippets(&ids).await?;

    Ok(snippets
        .into_iter()
        .map(|snippet| {
            let tags = by_snippet.remove(&snippet.id).unwrap_or_default();
            SnippetWithTags { snippet, tags }
        })
        .collect())
}

fn respond(snippet: Snippet, tags: Vec<Tag>) -> Json<SnippetWithTags> {
    Json(SnippetWithTags { snippet, tags })
}

/// `GET /snippets/` - list the caller's snippets, filtered.
async fn list_snippets(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SnippetListParams>,
) -> Result<Json<Vec<SnippetWithTags>>> {
    let query = params.into_query(SnippetScope::Owner(user.id))?;

    let snippets = SnippetRepository::new(state.pool()).list(&query).await?;
    let listed = with_tags(&TagRepository::new(state.pool()), snippets).await?;

    Ok(Json(listed))
}

/// `POST /snippets/` - create a snippet for the caller.
///
/// Embedded tag names are normalized and resolved to existing tag rows
/// where possible; new ones are created. Returns 201.
async fn create_snippet(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<SnippetWithTags>)> {
    let new = NewSnippet {
        title: body.title,
        code: body.code,
        language: body.language,
        description: body.description,
        is_public: body.is_public,
        tags: parse_tag_names(&body.tags)?,
    };

    let (snippet, tags) = SnippetRepository::new(state.pool())
        .create(user.id, &new)
        .await?;

    tracing::info!(snippet_id = %snippet.id, user_id = %user.id, "snippet created");

    Ok((StatusCode::CREATED, respond(snippet, tags)))
}

/// `GET /snippets/{id}` - fetch one of the caller's snippets.
async fn get_snippet(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<SnippetId>,
) -> Result<Json<SnippetWithTags>> {
    let snippet = SnippetRepository::new(state.pool())
        .get(SnippetScope::Owner(user.id), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet".to_owned()))?;

    let tags = TagRepository::new(state.pool()).for_snippet(id).await?;

    Ok(respond(snippet, tags))
}

/// `PUT /snippets/{id}` - partially update one of the caller's snippets.
async fn update_snippet(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<SnippetId>,
    Json(body): Json<UpdateSnippetRequest>,
) -> Result<Json<SnippetWithTags>> {
    let patch = SnippetPatch {
        title: body.title,
        code: body.code,
        language: body.language,
        description: body.description,
        is_public: body.is_public,
        tags: body
            .tags
            .as_deref()
            .map(parse_tag_names)
            .transpose()?,
    };

    let (snippet, tags) = SnippetRepository::new(state.pool())
        .update(user.id, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet".to_owned()))?;

    Ok(respond(snippet, tags))
}

/// `PATCH /snippets/{id}/toggle-public` - flip a snippet's visibility.
async fn toggle_public(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<SnippetId>,
) -> Result<Json<SnippetWithTags>> {
    let snippet = SnippetRepository::new(state.pool())
        .toggle_public(user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet".to_owned()))?;

    tracing::info!(snippet_id = %snippet.id, is_public = snippet.is_public, "visibility toggled");

    let tags = TagRepository::new(state.pool()).for_snippet(id).await?;

    Ok(respond(snippet, tags))
}

/// `DELETE /snippets/{id}` - delete one of the caller's snippets.
///
/// Removes the tag associations but leaves the tag rows for reuse.
/// Returns 204 on success.
async fn delete_snippet(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<SnippetId>,
) -> Result<StatusCode> {
    let deleted = SnippetRepository::new(state.pool())
        .delete(user.id, id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Snippet".to_owned()));
    }

    tracing::info!(snippet_id = %id, user_id = %user.id, "snippet deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_names_normalizes() {
        let raw = vec!["  Rust ".to_owned(), "WEB".to_owned()];
        let names = parse_tag_names(&raw).expect("valid tags");
        assert_eq!(names[0].as_str(), "rust");
        assert_eq!(names[1].as_str(), "web");
    }

    #[test]
    fn test_parse_tag_names_rejects_invalid() {
        let raw = vec![" ".to_owned()];
        assert!(matches!(
            parse_tag_names(&raw),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_create_request_defaults() {
        let body: CreateSnippetRequest =
            serde_json::from_str(r#"{"title":"t","code":"c","language":"rust"}"#)
                .expect("valid payload");
        assert!(!body.is_public);
        assert!(body.tags.is_empty());
        assert!(body.description.is_none());
    }

    #[test]
    fn test_update_request_absent_vs_supplied_tags() {
        let body: UpdateSnippetRequest =
            serde_json::from_str(r#"{"title":"new"}"#).expect("valid payload");
        assert!(body.tags.is_none());

        let body: UpdateSnippetRequest =
            serde_json::from_str(r#"{"tags":[]}"#).expect("valid payload");
        assert_eq!(body.tags, Some(Vec::new()));
    }
}
