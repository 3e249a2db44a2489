//! Database operations for SnipVault `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Accounts (unique username and email) plus password hash
//! - `snippets` - Code snippets owned by users
//! - `tags` - Normalized tag names (unique)
//! - `snippet_tags` - Snippet/tag association
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via
//! `sqlx migrate run` against the configured database.
//!
//! Queries use the sqlx runtime API (`query`/`query_as` with bound
//! arguments); dynamic filtering goes through `sqlx::QueryBuilder`.

pub mod snippets;
pub mod tags;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use snippets::{NewSnippet, SnippetPatch, SnippetQuery, SnippetRepository, SnippetScope};
pub use tags::TagRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username, email, or tag name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
