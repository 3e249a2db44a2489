//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Client-visible bodies are JSON
//! `{"detail": "..."}` with the status codes listed per variant.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request shape is valid but a field fails validation (422).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found, or exists but is not owned by the caller.
    /// The two cases are reported identically (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// No Authorization header supplied on a protected route (403).
    #[error("Not authenticated")]
    MissingAuth,
}

/// JSON error body, `{"detail": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::UserNotFound
                | AuthError::Inactive
                | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::AlreadyRegistered(_) => StatusCode::BAD_REQUEST,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidUsername(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AuthError::Repository(RepositoryError::Conflict(_)) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash
                | AuthError::TokenCreation
                | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingAuth => StatusCode::FORBIDDEN,
        }
    }

    fn detail(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) => "Internal server error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Incorrect username or password".to_owned(),
                AuthError::UserNotFound | AuthError::Inactive | AuthError::InvalidToken => {
                    "Invalid or expired token".to_owned()
                }
                AuthError::AlreadyRegistered(msg) | AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::InvalidUsername(e) => e.to_string(),
                AuthError::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
                AuthError::PasswordHash
                | AuthError::TokenCreation
                | AuthError::Repository(_) => "Internal server error".to_owned(),
            },
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::MissingAuth => "Not authenticated".to_owned(),
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            detail: self.detail(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
