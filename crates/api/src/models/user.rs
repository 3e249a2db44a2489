//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use snipvault_core::{Email, UserId, Username};

/// A user account.
///
/// The password hash never travels with this struct; the repository hands it
/// out separately to the auth service only.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
