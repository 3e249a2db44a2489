//! Query-string parameters for snippet listings.
//!
//! The same filter set applies to the owner-scoped and public-scoped list
//! endpoints; only the scope differs. Invalid values are a validation
//! error, never silently ignored.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use snipvault_core::TagName;

use crate::db::{SnippetQuery, SnippetScope};
use crate::error::AppError;

/// Filters accepted by the snippet list endpoints.
///
/// - `tag` filters on a single tag; `tags` accepts a comma-separated list.
///   Both may be combined; a snippet must carry ALL supplied tags.
/// - `created_after` / `created_before` accept `YYYY-MM-DD` or RFC 3339
///   and are inclusive bounds.
/// - `skip` / `limit` paginate (defaults 0 / 100).
#[derive(Debug, Default, Deserialize)]
pub struct SnippetListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub language: Option<String>,
    pub is_public: Option<bool>,
    pub tag: Option<String>,
    pub tags: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
}

impl SnippetListParams {
    /// Validate the parameters and build a [`SnippetQuery`] under `scope`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for malformed dates, invalid tag
    /// names, or negative pagination values.
    pub fn into_query(self, scope: SnippetScope) -> Result<SnippetQuery, AppError> {
        let mut query = SnippetQuery::new(scope);

        if let Some(skip) = self.skip {
            if skip < 0 {
                return Err(AppError::Validation("skip must not be negative".to_owned()));
            }
            query.offset = skip;
        }

        if let Some(limit) = self.limit {
            if limit < 0 {
                return Err(AppError::Validation(
                    "limit must not be negative".to_owned(),
                ));
            }
            query.limit = limit;
        }

        query.language = self.language;
        query.is_public = self.is_public;

        if let Some(raw) = self.created_after.as_deref() {
            query.created_after = Some(parse_date_bound(raw, Bound::Lower)?);
        }

        if let Some(raw) = self.created_before.as_deref() {
            query.created_before = Some(parse_date_bound(raw, Bound::Upper)?);
        }

        let mut names: Vec<TagName> = Vec::new();
        let singles = self.tag.iter().map(String::as_str);
        let listed = self
            .tags
            .iter()
            .flat_map(|list| list.split(','))
            .filter(|part| !part.trim().is_empty());
        for raw in singles.chain(listed) {
            let name =
                TagName::parse(raw).map_err(|e| AppError::Validation(format!("tag: {e}")))?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        query.tags = names;

        Ok(query)
    }
}

/// Which side of the range a date-only value bounds.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Parse a date filter value.
///
/// Accepts RFC 3339 timestamps as-is. A bare `YYYY-MM-DD` expands to the
/// start of that day for lower bounds and the end of it for upper bounds,
/// so both bounds include the named day.
fn parse_date_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match bound {
            Bound::Lower => NaiveTime::MIN,
            Bound::Upper => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap_or(NaiveTime::MIN),
        };
        return Ok(Utc.from_utc_datetime(&date.and_time(time)));
    }

    Err(AppError::Validation(format!(
        "invalid date '{raw}': expected YYYY-MM-DD or RFC 3339"
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_defaults() {
        let query = SnippetListParams::default()
            .into_query(SnippetScope::Public)
            .unwrap();
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, crate::db::snippets::DEFAULT_LIMIT);
        assert!(query.tags.is_empty());
        assert!(query.language.is_none());
    }

    #[test]
    fn test_negative_pagination_rejected() {
        let params = SnippetListParams {
            skip: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query(SnippetScope::Public),
            Err(AppError::Validation(_))
        ));

        let params = SnippetListParams {
            limit: Some(-5),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query(SnippetScope::Public),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_date_only_bounds_cover_the_day() {
        let params = SnippetListParams {
            created_after: Some("2024-03-01".to_owned()),
            created_before: Some("2024-03-01".to_owned()),
            ..Default::default()
        };
        let query = params.into_query(SnippetScope::Public).unwrap();

        let after = query.created_after.unwrap();
        let before = query.created_before.unwrap();
        assert_eq!(after.hour(), 0);
        assert_eq!(before.hour(), 23);
        assert!(after < before);
    }

    #[test]
    fn test_rfc3339_accepted() {
        let params = SnippetListParams {
            created_after: Some("2024-03-01T12:30:00Z".to_owned()),
            ..Default::default()
        };
        let query = params.into_query(SnippetScope::Public).unwrap();
        assert_eq!(query.created_after.unwrap().hour(), 12);
    }

    #[test]
    fn test_invalid_date_is_validation_error() {
        for bad in ["not-a-date", "2024-13-40", "01/02/2024"] {
            let params = SnippetListParams {
                created_after: Some(bad.to_owned()),
                ..Default::default()
            };
            assert!(
                matches!(
                    params.into_query(SnippetScope::Public),
                    Err(AppError::Validation(_))
                ),
                "expected validation error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_tag_params_merge_normalize_and_dedupe() {
        let params = SnippetListParams {
            tag: Some("Python".to_owned()),
            tags: Some(" rust , python,web".to_owned()),
            ..Default::default()
        };
        let query = params.into_query(SnippetScope::Public).unwrap();
        let names: Vec<&str> = query.tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["python", "rust", "web"]);
    }

    #[test]
    fn test_blank_tag_entries_ignored_but_invalid_rejected() {
        let params = SnippetListParams {
            tags: Some("rust,,web".to_owned()),
            ..Default::default()
        };
        let query = params.into_query(SnippetScope::Public).unwrap();
        assert_eq!(query.tags.len(), 2);

        let params = SnippetListParams {
            tags: Some("x".repeat(51)),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query(SnippetScope::Public),
            Err(AppError::Validation(_))
        ));
    }
}
