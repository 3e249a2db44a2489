//! Authentication extractors.
//!
//! Provides extractors for requiring bearer-token authentication in route
//! handlers. A missing `Authorization` header is rejected with 403; a
//! present but invalid or expired token with 401. The token's user is
//! loaded from the database so tokens for deleted or deactivated accounts
//! stop working immediately.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires bearer-token authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::MissingAuth)?;

        let user = state.auth().authenticate(token).await?;

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/snippets/");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).expect("valid request").into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        let parts = parts_with_header(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let parts = parts_with_header(Some("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&parts), None);
    }
}
