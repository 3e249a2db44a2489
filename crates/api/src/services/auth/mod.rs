//! Authentication service.
//!
//! Password hashing (Argon2id) and JWT bearer-token issuance/validation.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use snipvault_core::{Email, UserId, Username};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, stringified.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Authentication service.
///
/// Handles signup, login, and bearer-token validation.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
    token_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString, token_ttl: Duration) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
            token_ttl,
        }
    }

    /// Register a new user account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` if
    /// the identity fields are malformed.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AlreadyRegistered` if the username or email is taken.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;

        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(field) => AuthError::AlreadyRegistered(field),
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is
    /// wrong, without revealing which.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        self.issue_token(user.id)
    }

    /// Issue a signed access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + self.token_ttl).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|_| AuthError::TokenCreation)
    }

    /// Validate a bearer token and load the user it refers to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed/expired tokens,
    /// `AuthError::UserNotFound` if the account is gone, and
    /// `AuthError::Inactive` if it has been deactivated.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user_id = decode_token(token, self.jwt_secret)?;

        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        Ok(user)
    }
}

/// Decode a token and extract the user ID, without touching the database.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the signature, expiry, or subject
/// is invalid.
pub fn decode_token(token: &str, jwt_secret: &SecretString) -> Result<UserId, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    data.claims
        .sub
        .parse::<UserId>()
        .map_err(|_| AuthError::InvalidToken)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kJ8#mN2$pQ5&rT9!vX3@zA6^cE0*bD4(")
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("pw123456").unwrap();
        assert!(verify_password("pw123456", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("pw123456").unwrap();
        let b = hash_password("pw123456").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("pw123456").is_ok());
    }

    #[test]
    fn test_token_roundtrip() {
        let secret = secret();
        let claims = Claims {
            sub: UserId::new(42).to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        )
        .unwrap();

        let user_id = decode_token(&token, &secret).unwrap();
        assert_eq!(user_id, UserId::new(42));
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = secret();
        let claims = Claims {
            sub: UserId::new(1).to_string(),
            exp: (Utc::now() - Duration::minutes(5)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_token(&token, &secret),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let secret = secret();
        let other = SecretString::from("zY1!xW5$vU9&tS3@rQ7#pO2^nM6*lK0(");
        let claims = Claims {
            sub: UserId::new(1).to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(other.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_token(&token, &secret),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            decode_token("not-a-jwt", &secret()),
            Err(AuthError::InvalidToken)
        ));
    }
}
