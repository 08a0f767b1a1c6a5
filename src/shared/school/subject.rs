//! Subject Data Structures
//!
//! A subject is taught by zero or more teachers. Names and codes are unique;
//! codes are stored uppercase.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::SharedError;
use crate::shared::school::common::{has_text, merge_optional_text, merge_required_text, require_fields};
use crate::shared::validation;

/// A stored subject
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Subject {
    pub id: i64,
    pub subject_name: String,
    pub subject_code: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body of `POST /api/subjects` and `PUT /api/subjects/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectRequest {
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub description: Option<String>,
}

/// Validated subject column values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectInput {
    pub subject_name: String,
    pub subject_code: String,
    pub description: Option<String>,
}

impl SubjectRequest {
    /// Validate a create request
    pub fn validate(&self) -> Result<SubjectInput, SharedError> {
        require_fields(&[
            ("subject_name", has_text(&self.subject_name)),
            ("subject_code", has_text(&self.subject_code)),
        ])?;

        Ok(SubjectInput {
            subject_name: validation::require_len(
                self.subject_name.as_deref().unwrap_or_default(),
                "subject_name",
                2,
                100,
            )?,
            subject_code: validation::validate_subject_code(
                self.subject_code.as_deref().unwrap_or_default(),
            )?,
            description: validation::optional_text(self.description.as_deref(), "description", 500)?,
        })
    }

    /// Validate an update request, filling omitted fields from `existing`
    pub fn validate_against(&self, existing: &Subject) -> Result<SubjectInput, SharedError> {
        if self.subject_name.is_none() && self.subject_code.is_none() && self.description.is_none() {
            return Err(SharedError::EmptyUpdate);
        }

        let subject_code = match self.subject_code.as_deref() {
            None => existing.subject_code.clone(),
            Some(code) => validation::validate_subject_code(code)?,
        };

        Ok(SubjectInput {
            subject_name: merge_required_text(
                self.subject_name.as_deref(),
                existing.subject_name.clone(),
                "subject_name",
                2,
                100,
            )?,
            subject_code,
            description: merge_optional_text(
                self.description.as_deref(),
                existing.description.clone(),
                "description",
                500,
            )?,
        })
    }
}
