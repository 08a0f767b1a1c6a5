//! Teacher Data Structures
//!
//! Teachers belong to one subject and lead at most one class per academic
//! year.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::SharedError;
use crate::shared::school::common::{has_text, merge_required_text, require_fields, IdInput};
use crate::shared::validation;

/// Employment status of a teacher
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TeacherStatus {
    #[default]
    Active,
    Inactive,
}

impl TeacherStatus {
    pub const ALL: [(&'static str, TeacherStatus); 2] = [
        ("active", TeacherStatus::Active),
        ("inactive", TeacherStatus::Inactive),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherStatus::Active => "active",
            TeacherStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(TeacherStatus::Active),
            "inactive" => Some(TeacherStatus::Inactive),
            _ => None,
        }
    }

    /// Parse user input, producing a validation error on unknown values
    pub fn parse(value: &str) -> Result<Self, SharedError> {
        validation::parse_choice(value, "status", &Self::ALL)
    }
}

/// A teacher row joined with its subject name and class count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: TeacherStatus,
    pub class_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body of `POST /api/teachers` and `PUT /api/teachers/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject_id: Option<IdInput>,
    pub hire_date: Option<String>,
    pub status: Option<String>,
}

/// Validated teacher column values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject_id: i64,
    pub hire_date: Option<NaiveDate>,
    pub status: TeacherStatus,
}

impl TeacherRequest {
    /// Validate a create request
    pub fn validate(&self, today: NaiveDate) -> Result<TeacherInput, SharedError> {
        require_fields(&[
            ("name", has_text(&self.name)),
            ("email", has_text(&self.email)),
            ("subject_id", self.subject_id.is_some()),
        ])?;

        let subject_id = match &self.subject_id {
            Some(id) => id.resolve("subject_id")?,
            None => return Err(SharedError::missing(["subject_id"])),
        };

        Ok(TeacherInput {
            name: validation::require_len(self.name.as_deref().unwrap_or_default(), "name", 2, 100)?,
            email: validation::validate_email(self.email.as_deref().unwrap_or_default(), "email")?,
            phone: validation::validate_phone(self.phone.as_deref(), "phone")?,
            subject_id,
            hire_date: validation::optional_past_date(self.hire_date.as_deref(), "hire_date", today)?,
            status: match self.status.as_deref() {
                Some(status) => TeacherStatus::parse(status)?,
                None => TeacherStatus::default(),
            },
        })
    }

    /// Validate an update request, filling omitted fields from `existing`
    pub fn validate_against(&self, existing: &Teacher, today: NaiveDate) -> Result<TeacherInput, SharedError> {
        if self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.subject_id.is_none()
            && self.hire_date.is_none()
            && self.status.is_none()
        {
            return Err(SharedError::EmptyUpdate);
        }

        let email = match self.email.as_deref() {
            None => existing.email.clone(),
            Some(email) => validation::validate_email(email, "email")?,
        };
        let phone = match self.phone.as_deref() {
            None => existing.phone.clone(),
            Some(phone) => validation::validate_phone(Some(phone), "phone")?,
        };
        let subject_id = match (&self.subject_id, existing.subject_id) {
            (Some(id), _) => id.resolve("subject_id")?,
            (None, Some(id)) => id,
            (None, None) => return Err(SharedError::missing(["subject_id"])),
        };
        let hire_date = match self.hire_date.as_deref() {
            None => existing.hire_date,
            Some(raw) => validation::optional_past_date(Some(raw), "hire_date", today)?,
        };
        let status = match self.status.as_deref() {
            None => existing.status,
            Some(status) => TeacherStatus::parse(status)?,
        };

        Ok(TeacherInput {
            name: merge_required_text(self.name.as_deref(), existing.name.clone(), "name", 2, 100)?,
            email,
            phone,
            subject_id,
            hire_date,
            status,
        })
    }
}
