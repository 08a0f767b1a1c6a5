//! Common request helpers shared by every school resource
//!
//! Identifier coercion, pagination parameters, and the merge rules used by
//! partial updates.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::validation;

/// Default page size when only `page` is supplied
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// An identifier as it arrives in a JSON body
///
/// Clients send IDs either as JSON numbers or as numeric strings; both are
/// accepted and resolved to a positive `i64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    /// Resolve to a positive identifier, naming `field` in the error
    pub fn resolve(&self, field: &str) -> Result<i64, SharedError> {
        let id = match self {
            IdInput::Number(n) => Some(*n),
            IdInput::Text(s) => s.trim().parse::<i64>().ok(),
        };
        match id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(SharedError::validation(
                field,
                format!("{field} must be a valid number"),
            )),
        }
    }
}

impl From<i64> for IdInput {
    fn from(id: i64) -> Self {
        IdInput::Number(id)
    }
}

/// Raw `page` / `limit` query parameters
///
/// Kept as strings so malformed values surface as validation errors in
/// the response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn pagination(&self) -> Result<Option<Pagination>, SharedError> {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Query string of the search endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchQuery {
    /// The trimmed search term; blank or missing is rejected
    pub fn term(&self) -> Result<&str, SharedError> {
        match self.q.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => Ok(term),
            _ => Err(SharedError::validation("q", "Search query cannot be empty")),
        }
    }

    pub fn pagination(&self) -> Result<Option<Pagination>, SharedError> {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Build a page window from optional query values
    ///
    /// Neither value present means the listing is unpaginated (`None`).
    /// `page` alone uses [`DEFAULT_PAGE_SIZE`]; `limit` alone starts at page 1.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Result<Option<Self>, SharedError> {
        let page = page.map(str::trim).filter(|s| !s.is_empty());
        let limit = limit.map(str::trim).filter(|s| !s.is_empty());
        if page.is_none() && limit.is_none() {
            return Ok(None);
        }

        let page = match page {
            None => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| SharedError::validation("page", "page must be a positive integer"))?,
        };
        let limit = match limit {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
                .ok_or_else(|| {
                    SharedError::validation(
                        "limit",
                        format!("limit must be an integer between 1 and {MAX_PAGE_SIZE}"),
                    )
                })?,
        };
        if (page - 1).checked_mul(limit).is_none() {
            return Err(SharedError::validation("page", "page is too large for the requested limit"));
        }
        Ok(Some(Self { page, limit }))
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Merge an optional text column on update
///
/// `None` keeps `existing`; an empty string clears it; anything else is
/// trimmed and bounded.
pub fn merge_optional_text(
    incoming: Option<&str>,
    existing: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, SharedError> {
    match incoming {
        None => Ok(existing),
        Some(value) => validation::optional_text(Some(value), field, max),
    }
}

/// Merge a required text column on update; `None` keeps `existing`
pub fn merge_required_text(
    incoming: Option<&str>,
    existing: String,
    field: &str,
    min: usize,
    max: usize,
) -> Result<String, SharedError> {
    match incoming {
        None => Ok(existing),
        Some(value) => validation::require_len(value, field, min, max),
    }
}

/// Names of the required fields that are absent, in the order given
pub fn missing_fields<'a>(fields: &[(&'a str, bool)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

/// Return `Err(MissingFields)` when any required field is absent
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), SharedError> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SharedError::missing(missing))
    }
}

/// True when a text field is present and not blank
pub fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_id_input_accepts_numbers_and_numeric_strings() {
        let number: IdInput = serde_json::from_str("7").unwrap();
        let text: IdInput = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(number.resolve("class_id").unwrap(), 7);
        assert_eq!(text.resolve("class_id").unwrap(), 12);
    }

    #[test]
    fn test_id_input_rejects_non_positive_and_garbage() {
        assert!(IdInput::Number(0).resolve("student_id").is_err());
        assert!(IdInput::Number(-4).resolve("student_id").is_err());
        let err = IdInput::Text("abc".into()).resolve("student_id").unwrap_err();
        assert_eq!(err.to_string(), "student_id must be a valid number");
    }

    #[test]
    fn test_pagination_rejects_page_past_offset_range() {
        let max = i64::MAX.to_string();
        let err = Pagination::from_query(Some(&max), Some("100")).unwrap_err();
        assert_eq!(err.to_string(), "page is too large for the requested limit");

        let last = (i64::MAX / 100 + 1).to_string();
        let page = Pagination::from_query(Some(&last), Some("100")).unwrap().unwrap();
        assert_eq!(page.offset(), i64::MAX / 100 * 100);
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(Pagination::from_query(None, None).unwrap(), None);
        assert_eq!(
            Pagination::from_query(Some("3"), None).unwrap(),
            Some(Pagination { page: 3, limit: 20 })
        );
        assert_eq!(
            Pagination::from_query(None, Some("5")).unwrap(),
            Some(Pagination { page: 1, limit: 5 })
        );
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(Pagination::from_query(Some("0"), None).is_err());
        assert!(Pagination::from_query(Some("x"), None).is_err());
        assert!(Pagination::from_query(None, Some("0")).is_err());
        assert!(Pagination::from_query(None, Some("101")).is_err());
        assert!(Pagination::from_query(None, Some("100")).is_ok());
    }

    #[test]
    fn test_pagination_offset() {
        let page = Pagination { page: 2, limit: 10 };
        assert_eq!(page.offset(), 10);
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), 0);
    }

    #[test]
    fn test_search_term() {
        let query = SearchQuery {
            q: Some("  ada ".into()),
            page: Some("2".into()),
            ..Default::default()
        };
        assert_eq!(query.term().unwrap(), "ada");
        assert_eq!(query.pagination().unwrap(), Some(Pagination { page: 2, limit: 20 }));

        let blank = SearchQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.term().unwrap_err().to_string(), "Search query cannot be empty");
        assert!(SearchQuery::default().term().is_err());
    }

    #[test]
    fn test_merge_optional_text() {
        let existing = Some("old".to_string());
        assert_eq!(
            merge_optional_text(None, existing.clone(), "section", 10).unwrap(),
            existing
        );
        assert_eq!(
            merge_optional_text(Some("  "), existing.clone(), "section", 10).unwrap(),
            None
        );
        assert_eq!(
            merge_optional_text(Some(" B "), existing, "section", 10).unwrap(),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_require_fields_lists_all_missing() {
        let err = require_fields(&[("name", false), ("email", true), ("subject_id", false)])
            .unwrap_err();
        assert_matches!(err, SharedError::MissingFields { ref fields } if fields == &["name", "subject_id"]);
    }
}
