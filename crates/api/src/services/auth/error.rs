//! Authentication error type.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password. Deliberately indistinguishable from an
    /// unknown user so login failures leak nothing.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The user no longer exists (e.g. token for a deleted account).
    #[error("user not found")]
    UserNotFound,

    /// The account has been deactivated.
    #[error("account is inactive")]
    Inactive,

    /// Username or email is already registered.
    #[error("{0}")]
    AlreadyRegistered(String),

    /// Password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] snipvault_core::EmailError),

    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] snipvault_core::UsernameError),

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Token could not be created.
    #[error("failed to create access token")]
    TokenCreation,

    /// Bearer token is malformed, has a bad signature, or is expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
