//! Current-user endpoint.

use axum::{Json, Router, routing::get};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/users/me", get(me))
}

/// `GET /users/me` - the authenticated user's own account.
///
/// The serialized user never includes the password hash; the model does
/// not carry it.
async fn me(RequireAuth(user): RequireAuth) -> Result<Json<User>> {
    Ok(Json(user))
}
