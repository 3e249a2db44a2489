//! Tag listing and direct creation.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use snipvault_core::TagName;

use crate::db::TagRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Tag;
use crate::state::AppState;

/// Direct tag-creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tags/", get(list_tags).post(create_tag))
}

/// `GET /tags/` - list all tags, anonymously.
async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    let tags = TagRepository::new(state.pool()).list().await?;

    Ok(Json(tags))
}

/// `POST /tags/` - create a tag directly.
///
/// The name is normalized before insertion, so `"Rust"` and `"rust"`
/// are the same tag. Re-creating an existing tag is a 400; snippet
/// creation uses an idempotent upsert instead and never hits this.
async fn create_tag(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>)> {
    let name =
        TagName::parse(&body.name).map_err(|e| AppError::Validation(format!("name: {e}")))?;

    let tag = TagRepository::new(state.pool()).create(&name).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}
