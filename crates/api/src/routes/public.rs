//! Anonymous access to public snippets.
//!
//! These routes never require a credential and can only see rows with
//! `is_public = TRUE`. A private snippet is a 404 here even for its
//! owner.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use snipvault_core::SnippetId;

use crate::db::{SnippetRepository, SnippetScope, TagRepository};
use crate::error::{AppError, Result};
use crate::models::SnippetWithTags;
use crate::routes::params::SnippetListParams;
use crate::routes::snippets::with_tags;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public/snippets/", get(list_public))
        .route("/public/snippets/{id}", get(get_public))
}

/// `GET /public/snippets/` - list public snippets, filtered.
///
/// Accepts the same filter set as the owner-scoped listing.
async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<SnippetListParams>,
) -> Result<Json<Vec<SnippetWithTags>>> {
    let query = params.into_query(SnippetScope::Public)?;

    let snippets = SnippetRepository::new(state.pool()).list(&query).await?;
    let listed = with_tags(&TagRepository::new(state.pool()), snippets).await?;

    Ok(Json(listed))
}

/// `GET /public/snippets/{id}` - fetch one public snippet.
async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<SnippetId>,
) -> Result<Json<SnippetWithTags>> {
    let snippet = SnippetRepository::new(state.pool())
        .get(SnippetScope::Public, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet".to_owned()))?;

    let tags = TagRepository::new(state.pool()).for_snippet(id).await?;

    Ok(Json(SnippetWithTags { snippet, tags }))
}
