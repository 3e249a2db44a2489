//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-zA-Z0-9_-]`.
    #[error("username may only contain letters, digits, '_' and '-'")]
    InvalidCharacter,
}

/// A login name.
///
/// ## Constraints
///
/// - Length: 3-32 characters
/// - Characters: ASCII letters, digits, `_`, `-`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, outside the length bounds,
    /// or contains a disallowed character.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Username {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Username {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Username {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("user_name-1").is_ok());
        assert!(Username::parse("abc").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(33);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Username::parse("al ice"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("alice@home"),
            Err(UsernameError::InvalidCharacter)
        ));
    }
}
