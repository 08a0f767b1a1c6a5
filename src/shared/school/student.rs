//! Student Data Structures
//!
//! Students are enrolled in one class and identified to people by a
//! generated `student_code` (`STU` + year + five digits). Removing a student
//! normally only marks it inactive.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::SharedError;
use crate::shared::school::attendance::AttendanceRecord;
use crate::shared::school::common::{
    has_text, merge_optional_text, merge_required_text, require_fields, IdInput, Pagination,
};
use crate::shared::validation;

/// Enrollment status of a student
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
    Transferred,
}

impl StudentStatus {
    pub const ALL: [(&'static str, StudentStatus); 4] = [
        ("active", StudentStatus::Active),
        ("inactive", StudentStatus::Inactive),
        ("graduated", StudentStatus::Graduated),
        ("transferred", StudentStatus::Transferred),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Graduated => "graduated",
            StudentStatus::Transferred => "transferred",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SharedError> {
        validation::parse_choice(value, "status", &Self::ALL)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [(&'static str, Gender); 3] = [
        ("male", Gender::Male),
        ("female", Gender::Female),
        ("other", Gender::Other),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse an optional gender; blank input means "not recorded"
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, SharedError> {
        match value.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(gender) => validation::parse_choice(gender, "gender", &Self::ALL).map(Some),
        }
    }
}

/// Build a student code from the enrollment year and a random seed
pub fn student_code(year: i32, seed: u128) -> String {
    format!("STU{year}{:05}", seed % 100_000)
}

/// A student row joined with its class name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Student {
    pub id: i64,
    pub student_code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
    pub enrollment_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: StudentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A student with its attendance history, newest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub attendance: Vec<AttendanceRecord>,
}

/// Body of `POST /api/students` and `PUT /api/students/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub class_id: Option<IdInput>,
    pub enrollment_date: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: Option<String>,
}

/// Validated student column values; the code is assigned at insert time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub class_id: i64,
    pub enrollment_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: StudentStatus,
}

impl StudentRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.class_id.is_none()
            && self.enrollment_date.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
            && self.address.is_none()
            && self.guardian_name.is_none()
            && self.guardian_phone.is_none()
            && self.status.is_none()
    }

    /// Validate a create request
    pub fn validate(&self, today: NaiveDate) -> Result<StudentInput, SharedError> {
        require_fields(&[
            ("name", has_text(&self.name)),
            ("class_id", self.class_id.is_some()),
            ("enrollment_date", has_text(&self.enrollment_date)),
        ])?;

        let class_id = match &self.class_id {
            Some(id) => id.resolve("class_id")?,
            None => return Err(SharedError::missing(["class_id"])),
        };

        Ok(StudentInput {
            name: validation::require_len(self.name.as_deref().unwrap_or_default(), "name", 2, 100)?,
            email: validation::optional_email(self.email.as_deref(), "email")?,
            phone: validation::validate_phone(self.phone.as_deref(), "phone")?,
            class_id,
            enrollment_date: validation::parse_date(
                self.enrollment_date.as_deref().unwrap_or_default(),
                "enrollment_date",
            )?,
            date_of_birth: validation::optional_past_date(
                self.date_of_birth.as_deref(),
                "date_of_birth",
                today,
            )?,
            gender: Gender::parse_optional(self.gender.as_deref())?,
            address: validation::optional_text(self.address.as_deref(), "address", 500)?,
            guardian_name: validation::optional_text(self.guardian_name.as_deref(), "guardian_name", 100)?,
            guardian_phone: validation::validate_phone(self.guardian_phone.as_deref(), "guardian_phone")?,
            status: match self.status.as_deref() {
                Some(status) => StudentStatus::parse(status)?,
                None => StudentStatus::default(),
            },
        })
    }

    /// Validate an update request, filling omitted fields from `existing`
    pub fn validate_against(&self, existing: &Student, today: NaiveDate) -> Result<StudentInput, SharedError> {
        if self.is_empty() {
            return Err(SharedError::EmptyUpdate);
        }

        let class_id = match (&self.class_id, existing.class_id) {
            (Some(id), _) => id.resolve("class_id")?,
            (None, Some(id)) => id,
            (None, None) => return Err(SharedError::missing(["class_id"])),
        };

        Ok(StudentInput {
            name: merge_required_text(self.name.as_deref(), existing.name.clone(), "name", 2, 100)?,
            email: match self.email.as_deref() {
                None => existing.email.clone(),
                Some(email) => validation::optional_email(Some(email), "email")?,
            },
            phone: match self.phone.as_deref() {
                None => existing.phone.clone(),
                Some(phone) => validation::validate_phone(Some(phone), "phone")?,
            },
            class_id,
            enrollment_date: match self.enrollment_date.as_deref() {
                None => existing.enrollment_date,
                Some(raw) => validation::parse_date(raw, "enrollment_date")?,
            },
            date_of_birth: match self.date_of_birth.as_deref() {
                None => existing.date_of_birth,
                Some(raw) => validation::optional_past_date(Some(raw), "date_of_birth", today)?,
            },
            gender: match self.gender.as_deref() {
                None => existing.gender,
                Some(gender) => Gender::parse_optional(Some(gender))?,
            },
            address: merge_optional_text(self.address.as_deref(), existing.address.clone(), "address", 500)?,
            guardian_name: merge_optional_text(
                self.guardian_name.as_deref(),
                existing.guardian_name.clone(),
                "guardian_name",
                100,
            )?,
            guardian_phone: match self.guardian_phone.as_deref() {
                None => existing.guardian_phone.clone(),
                Some(phone) => validation::validate_phone(Some(phone), "guardian_phone")?,
            },
            status: match self.status.as_deref() {
                None => existing.status,
                Some(status) => StudentStatus::parse(status)?,
            },
        })
    }
}

/// Query string of `GET /api/students`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub class_id: Option<String>,
    pub search: Option<String>,
}

/// Validated listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub status: Option<StudentStatus>,
    pub class_id: Option<i64>,
    pub search: Option<String>,
}

impl StudentListQuery {
    pub fn filter(&self) -> Result<StudentFilter, SharedError> {
        Ok(StudentFilter {
            status: match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(status) => Some(StudentStatus::parse(status)?),
                None => None,
            },
            class_id: validation::parse_optional_id(self.class_id.as_deref(), "class_id")?,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    pub fn pagination(&self) -> Result<Option<Pagination>, SharedError> {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn request() -> StudentRequest {
        StudentRequest {
            name: Some(" Lin Wei ".into()),
            email: Some("Lin.Wei@Example.com".into()),
            class_id: Some(IdInput::Number(2)),
            enrollment_date: Some("2025-09-01".into()),
            gender: Some("Female".into()),
            ..Default::default()
        }
    }

    fn stored() -> Student {
        let ts = today().and_hms_opt(0, 0, 0).unwrap();
        Student {
            id: 1,
            student_code: "STU202500042".into(),
            name: "Lin Wei".into(),
            email: Some("lin.wei@example.com".into()),
            phone: Some("555 0100".into()),
            class_id: Some(2),
            class_name: Some("Grade 5".into()),
            enrollment_date: today(),
            date_of_birth: None,
            gender: Some(Gender::Female),
            address: Some("1 Main St".into()),
            guardian_name: None,
            guardian_phone: None,
            status: StudentStatus::Active,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_student_code_format() {
        assert_eq!(student_code(2025, 42), "STU202500042");
        assert_eq!(student_code(2025, 1_234_567), "STU202534567");
        assert_eq!(student_code(2026, 0).len(), 12);
    }

    #[test]
    fn test_create_normalizes() {
        let input = request().validate(today()).unwrap();
        assert_eq!(input.name, "Lin Wei");
        assert_eq!(input.email.as_deref(), Some("lin.wei@example.com"));
        assert_eq!(input.gender, Some(Gender::Female));
        assert_eq!(input.status, StudentStatus::Active);
    }

    #[test]
    fn test_create_requires_fields() {
        let err = StudentRequest::default().validate(today()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: name, class_id, enrollment_date"
        );
    }

    #[test]
    fn test_create_rejects_future_birth_date() {
        let mut req = request();
        req.date_of_birth = Some("2030-01-01".into());
        assert!(req.validate(today()).is_err());
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let update = StudentRequest {
            guardian_name: Some("  Mei Wei ".into()),
            address: Some(String::new()),
            ..Default::default()
        };
        let merged = update.validate_against(&stored(), today()).unwrap();
        assert_eq!(merged.guardian_name.as_deref(), Some("Mei Wei"));
        assert_eq!(merged.address, None);
        assert_eq!(merged.name, "Lin Wei");
        assert_eq!(merged.phone.as_deref(), Some("555 0100"));
        assert_eq!(merged.class_id, 2);
    }

    #[test]
    fn test_list_query_filter() {
        let query = StudentListQuery {
            status: Some("Graduated".into()),
            class_id: Some("3".into()),
            search: Some("  ".into()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.status, Some(StudentStatus::Graduated));
        assert_eq!(filter.class_id, Some(3));
        assert_eq!(filter.search, None);
    }
}
