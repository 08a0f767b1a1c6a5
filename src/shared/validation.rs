//! Input Validation and Normalization
//!
//! Pure checks applied at the request boundary before any query runs:
//! required fields, ID coercion, length bounds, format patterns,
//! enumerated membership, and date parsing with temporal bounds.
//!
//! Every function trims its input and returns the normalized value, so
//! callers store exactly what was validated.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::shared::error::SharedError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-+()]+$").expect("phone pattern is valid"));

static SUBJECT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("code pattern is valid"));

static ACADEMIC_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("year pattern is valid"));

/// Grade levels a class may be assigned to, in canonical spelling
pub const GRADE_LEVELS: [&str; 16] = [
    "1",
    "2",
    "3",
    "4",
    "5",
    "6",
    "7",
    "8",
    "9",
    "10",
    "11",
    "12",
    "Kindergarten",
    "Pre-K",
    "K",
    "KG",
];

/// How far an academic year's start may drift from the current year
pub const ACADEMIC_YEAR_WINDOW: i32 = 5;

/// Report month/year bounds
pub const MIN_REPORT_YEAR: i32 = 2000;
pub const MAX_REPORT_YEAR: i32 = 2100;

/// Parse a path or query identifier ("12" → 12)
///
/// `label` names the entity for the error message, e.g. `"student"`.
pub fn parse_id(raw: &str, label: &str) -> Result<i64, SharedError> {
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| SharedError::validation("id", format!("Valid {label} ID is required")))?;
    if id <= 0 {
        return Err(SharedError::validation(
            "id",
            format!("{label} ID must be a positive number"),
        ));
    }
    Ok(id)
}

/// Parse an optional identifier carried in a query string
pub fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<i64>, SharedError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => match value.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Some(id)),
            _ => Err(SharedError::validation(
                field,
                format!("{field} must be a valid number"),
            )),
        },
    }
}

/// Trim and bound a required string by character count
pub fn require_len(value: &str, field: &str, min: usize, max: usize) -> Result<String, SharedError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min {
        return Err(SharedError::validation(
            field,
            format!("{field} must be at least {min} characters long"),
        ));
    }
    if len > max {
        return Err(SharedError::validation(
            field,
            format!("{field} must not exceed {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional string; empty input becomes `None`
pub fn optional_text(value: Option<&str>, field: &str, max: usize) -> Result<Option<String>, SharedError> {
    let Some(trimmed) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(SharedError::validation(
            field,
            format!("{field} must not exceed {max} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate and lowercase an email address
pub fn validate_email(value: &str, field: &str) -> Result<String, SharedError> {
    let email = value.trim().to_lowercase();
    if email.chars().count() > 100 || !EMAIL_RE.is_match(&email) {
        return Err(SharedError::validation(field, "Invalid email format"));
    }
    Ok(email)
}

/// Validate an optional email; empty input becomes `None`
pub fn optional_email(value: Option<&str>, field: &str) -> Result<Option<String>, SharedError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(email) => validate_email(email, field).map(Some),
    }
}

/// Validate an optional phone number (digits, spaces, `+`, `-`, parentheses)
pub fn validate_phone(value: Option<&str>, field: &str) -> Result<Option<String>, SharedError> {
    let Some(phone) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if phone.chars().count() > 20 || !PHONE_RE.is_match(phone) {
        return Err(SharedError::validation(
            field,
            format!("Invalid {field} format"),
        ));
    }
    Ok(Some(phone.to_string()))
}

/// Validate and uppercase a subject code
pub fn validate_subject_code(value: &str) -> Result<String, SharedError> {
    let code = require_len(value, "subject_code", 2, 20)?;
    if !SUBJECT_CODE_RE.is_match(&code) {
        return Err(SharedError::validation(
            "subject_code",
            "subject_code may only contain letters, numbers, hyphens and underscores",
        ));
    }
    Ok(code.to_uppercase())
}

/// Validate an academic year label such as `2025-2026`
///
/// The end year must follow the start year, and the start year must lie
/// within [`ACADEMIC_YEAR_WINDOW`] years of `current_year`.
pub fn validate_academic_year(value: &str, current_year: i32) -> Result<String, SharedError> {
    let trimmed = value.trim();
    let invalid = || {
        SharedError::validation(
            "academic_year",
            "academic_year must be in YYYY-YYYY format",
        )
    };
    let captures = ACADEMIC_YEAR_RE.captures(trimmed).ok_or_else(invalid)?;
    let start: i32 = captures[1].parse().map_err(|_| invalid())?;
    let end: i32 = captures[2].parse().map_err(|_| invalid())?;

    if end != start + 1 {
        return Err(SharedError::validation(
            "academic_year",
            "academic_year end year must be exactly one year after the start year",
        ));
    }
    if (start - current_year).abs() > ACADEMIC_YEAR_WINDOW {
        return Err(SharedError::validation(
            "academic_year",
            format!(
                "academic_year must start within {ACADEMIC_YEAR_WINDOW} years of {current_year}"
            ),
        ));
    }
    Ok(trimmed.to_string())
}

/// Match a grade level case-insensitively and return its canonical spelling
pub fn validate_grade_level(value: &str) -> Result<String, SharedError> {
    let trimmed = value.trim();
    GRADE_LEVELS
        .iter()
        .find(|level| level.eq_ignore_ascii_case(trimmed))
        .map(|level| (*level).to_string())
        .ok_or_else(|| {
            SharedError::validation(
                "grade_level",
                format!("grade_level must be one of: {}", GRADE_LEVELS.join(", ")),
            )
        })
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, SharedError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SharedError::validation(field, format!("Invalid {field} format. Use YYYY-MM-DD"))
    })
}

/// Reject dates after `today`
pub fn ensure_not_future(date: NaiveDate, field: &str, today: NaiveDate) -> Result<NaiveDate, SharedError> {
    if date > today {
        return Err(SharedError::validation(
            field,
            format!("{field} cannot be in the future"),
        ));
    }
    Ok(date)
}

/// Parse an optional date that may not lie in the future
pub fn optional_past_date(
    value: Option<&str>,
    field: &str,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, SharedError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => {
            let date = parse_date(raw, field)?;
            ensure_not_future(date, field, today).map(Some)
        }
    }
}

/// Validate report month and year query values
pub fn parse_month_year(month: Option<&str>, year: Option<&str>) -> Result<(u32, i32), SharedError> {
    let (Some(month), Some(year)) = (
        month.map(str::trim).filter(|s| !s.is_empty()),
        year.map(str::trim).filter(|s| !s.is_empty()),
    ) else {
        return Err(SharedError::validation(
            "month",
            "Month and year are required",
        ));
    };

    let month = month
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| {
            SharedError::validation("month", "Month must be a number between 1 and 12")
        })?;
    let year = year
        .parse::<i32>()
        .ok()
        .filter(|y| (MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(y))
        .ok_or_else(|| {
            SharedError::validation(
                "year",
                format!(
                    "Year must be a valid number between {MIN_REPORT_YEAR} and {MAX_REPORT_YEAR}"
                ),
            )
        })?;
    Ok((month, year))
}

/// First day of the month and first day of the following month
pub fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), SharedError> {
    let invalid = || SharedError::validation("month", "Month must be a number between 1 and 12");
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((start, end))
}

/// Parse a lowercase enumerated value from its allowed spellings
pub fn parse_choice<T: Copy>(
    value: &str,
    field: &str,
    choices: &[(&str, T)],
) -> Result<T, SharedError> {
    let lowered = value.trim().to_lowercase();
    choices
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, v)| *v)
        .ok_or_else(|| {
            let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
            SharedError::validation(
                field,
                format!("{field} must be one of: {}", names.join(", ")),
            )
        })
}

/// Current calendar year in UTC
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "student").unwrap(), 42);
        assert_eq!(parse_id(" 7 ", "class").unwrap(), 7);
        assert_eq!(
            parse_id("abc", "student").unwrap_err().to_string(),
            "Valid student ID is required"
        );
        assert!(parse_id("0", "subject").is_err());
        assert!(parse_id("-3", "subject").is_err());
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id(None, "class_id").unwrap(), None);
        assert_eq!(parse_optional_id(Some(""), "class_id").unwrap(), None);
        assert_eq!(parse_optional_id(Some("5"), "class_id").unwrap(), Some(5));
        assert!(parse_optional_id(Some("x"), "class_id").is_err());
    }

    #[test]
    fn test_require_len_trims_and_counts_chars() {
        assert_eq!(require_len("  Math ", "name", 2, 100).unwrap(), "Math");
        assert!(require_len(" a ", "name", 2, 100).is_err());
        assert!(require_len(&"x".repeat(101), "name", 2, 100).is_err());
        assert_eq!(require_len("ÉÉ", "name", 2, 2).unwrap(), "ÉÉ");
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None, "description", 500).unwrap(), None);
        assert_eq!(optional_text(Some("   "), "description", 500).unwrap(), None);
        assert_eq!(
            optional_text(Some(" notes "), "description", 500).unwrap(),
            Some("notes".to_string())
        );
        assert!(optional_text(Some(&"x".repeat(501)), "description", 500).is_err());
    }

    #[test]
    fn test_email_is_lowercased() {
        assert_eq!(
            validate_email(" Jane.Doe@School.EDU ", "email").unwrap(),
            "jane.doe@school.edu"
        );
        assert!(validate_email("not-an-email", "email").is_err());
        assert!(validate_email("a@b", "email").is_err());
        assert!(validate_email("a b@c.d", "email").is_err());
    }

    #[test]
    fn test_phone_format() {
        assert_eq!(
            validate_phone(Some("+1 (555) 010-2000"), "phone").unwrap(),
            Some("+1 (555) 010-2000".to_string())
        );
        assert!(validate_phone(Some("555-CALL"), "phone").is_err());
        assert_eq!(validate_phone(Some(""), "phone").unwrap(), None);
    }

    #[test]
    fn test_subject_code_uppercased() {
        assert_eq!(validate_subject_code(" math-101 ").unwrap(), "MATH-101");
        assert_eq!(validate_subject_code("sci_2").unwrap(), "SCI_2");
        assert!(validate_subject_code("m").is_err());
        assert!(validate_subject_code("MATH 101").is_err());
        assert!(validate_subject_code(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_academic_year() {
        assert_eq!(validate_academic_year("2025-2026", 2025).unwrap(), "2025-2026");
        assert!(validate_academic_year("2025-2027", 2025).is_err());
        assert!(validate_academic_year("2025/2026", 2025).is_err());
        assert!(validate_academic_year("2015-2016", 2025).is_err());
        assert!(validate_academic_year("2030-2031", 2025).is_ok());
        assert!(validate_academic_year("2031-2032", 2025).is_err());
    }

    #[test]
    fn test_grade_level_canonical() {
        assert_eq!(validate_grade_level("kindergarten").unwrap(), "Kindergarten");
        assert_eq!(validate_grade_level("pre-k").unwrap(), "Pre-K");
        assert_eq!(validate_grade_level(" 12 ").unwrap(), "12");
        assert!(validate_grade_level("13").is_err());
        assert!(validate_grade_level("").is_err());
    }

    #[test]
    fn test_dates() {
        assert_eq!(parse_date("2025-03-14", "date").unwrap(), date(2025, 3, 14));
        assert!(parse_date("14/03/2025", "date").is_err());
        assert!(parse_date("2025-02-30", "date").is_err());

        let today = date(2025, 6, 1);
        assert!(ensure_not_future(date(2025, 6, 1), "hire_date", today).is_ok());
        assert_eq!(
            ensure_not_future(date(2025, 6, 2), "hire_date", today)
                .unwrap_err()
                .to_string(),
            "hire_date cannot be in the future"
        );
        assert_eq!(optional_past_date(Some(""), "date_of_birth", today).unwrap(), None);
    }

    #[test]
    fn test_month_year() {
        assert_eq!(parse_month_year(Some("3"), Some("2025")).unwrap(), (3, 2025));
        assert!(parse_month_year(Some("3"), None).is_err());
        assert!(parse_month_year(Some("13"), Some("2025")).is_err());
        assert!(parse_month_year(Some("0"), Some("2025")).is_err());
        assert!(parse_month_year(Some("1"), Some("1999")).is_err());
    }

    #[test]
    fn test_month_bounds_wraps_december() {
        assert_eq!(
            month_bounds(12, 2024).unwrap(),
            (date(2024, 12, 1), date(2025, 1, 1))
        );
        assert_eq!(
            month_bounds(2, 2024).unwrap(),
            (date(2024, 2, 1), date(2024, 3, 1))
        );
    }

    #[test]
    fn test_parse_choice_case_insensitive() {
        let choices = [("active", 1), ("inactive", 2)];
        assert_eq!(parse_choice("ACTIVE", "status", &choices).unwrap(), 1);
        assert_eq!(
            parse_choice("gone", "status", &choices).unwrap_err().to_string(),
            "status must be one of: active, inactive"
        );
    }

    proptest! {
        #[test]
        fn prop_subject_code_output_is_uppercase(code in "[A-Za-z0-9_-]{2,20}") {
            let normalized = validate_subject_code(&code).unwrap();
            prop_assert_eq!(normalized.clone(), normalized.to_uppercase());
            prop_assert_eq!(normalized.len(), code.len());
        }

        #[test]
        fn prop_valid_academic_years_accepted(offset in -5i32..=5) {
            let start = 2025 + offset;
            let label = format!("{}-{}", start, start + 1);
            prop_assert!(validate_academic_year(&label, 2025).is_ok());
        }

        #[test]
        fn prop_positive_ids_roundtrip(id in 1i64..i64::MAX) {
            prop_assert_eq!(parse_id(&id.to_string(), "student").unwrap(), id);
        }
    }
}
