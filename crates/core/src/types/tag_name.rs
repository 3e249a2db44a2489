//! Normalized tag name type.
//!
//! Tag names are case-insensitive: `"Python"`, `" python "` and `"PYTHON"`
//! all refer to the same tag. Normalization happens at parse time so the
//! rest of the system only ever sees the canonical form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TagName`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TagNameError {
    /// The input is empty after trimming.
    #[error("tag name cannot be empty")]
    Empty,
    /// The input exceeds the maximum length after trimming.
    #[error("tag name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A tag name in canonical form (trimmed, lower-case).
///
/// The same normalization rules apply everywhere a tag name enters the
/// system: the direct tag-creation endpoint and tag lists embedded in
/// snippet create/update requests.
///
/// ## Examples
///
/// ```
/// use snipvault_core::TagName;
///
/// let tag = TagName::parse("  Python ").unwrap();
/// assert_eq!(tag.as_str(), "python");
///
/// assert!(TagName::parse("   ").is_err());
/// assert!(TagName::parse(&"x".repeat(51)).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Maximum length of a tag name.
    pub const MAX_LENGTH: usize = 50;

    /// Parse a `TagName` from a string, normalizing it to canonical form.
    ///
    /// Surrounding whitespace is trimmed and the result is lower-cased.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, TagNameError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(TagNameError::Empty);
        }

        if normalized.chars().count() > Self::MAX_LENGTH {
            return Err(TagNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the canonical tag name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TagName {
    type Err = TagNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TagName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TagName {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are stored pre-normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TagName {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
