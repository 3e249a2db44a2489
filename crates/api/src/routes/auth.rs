//! Account registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::User;
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A freshly issued access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

/// `POST /auth/signup` - register a new account.
///
/// Returns 201 with the created user. Duplicate username or email is a
/// 400; malformed identity fields or a weak password are a 422.
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state
        .auth()
        .signup(&body.username, &body.email, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "account created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/login` - exchange credentials for a bearer token.
///
/// Wrong username and wrong password are both a 401 with the same
/// message.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let access_token = state.auth().login(&body.username, &body.password).await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
