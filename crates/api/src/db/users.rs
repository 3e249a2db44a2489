//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;

use snipvault_core::{Email, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

fn user_from_row(row: &PgRow) -> Result<User, RepositoryError> {
    let username = Username::parse(row.try_get::<String, _>("username")?.as_str())
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid username in database: {e}")))?;
    let email = Email::parse(row.try_get::<String, _>("email")?.as_str())
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        username,
        email,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<Option<DateTime<Utc>>, _>("updated_at")?,
    })
}

/// Map a unique violation to a `Conflict` naming the conflicting field.
fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let constraint = db_err.constraint().unwrap_or_default();
        let message = if constraint.contains("email") {
            "email already registered"
        } else {
            "username already registered"
        };
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming the conflicting field if
    /// the username or email is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO users (username, email, hashed_password, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, username, email, is_active, created_at, updated_at
            ",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)?;

        user_from_row(&row)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored identity fields are invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Get a user and their password hash by username.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, is_active, created_at, updated_at, hashed_password
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = user_from_row(&row)?;
        let password_hash: String = row.try_get("hashed_password")?;

        Ok(Some((user, password_hash)))
    }
}
