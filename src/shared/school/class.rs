//! Class Data Structures

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::SharedError;
use crate::shared::school::common::{has_text, merge_optional_text, merge_required_text, require_fields, IdInput};
use crate::shared::school::student::Student;
use crate::shared::validation;

/// A class row joined with its teacher's name and enrollment count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Class {
    pub id: i64,
    pub class_name: String,
    pub grade_level: String,
    pub section: Option<String>,
    pub teacher_id: Option<i64>,
    pub teacher_name: Option<String>,
    pub academic_year: String,
    pub student_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A class with its teacher's subject and enrolled students
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: Class,
    pub subject_name: Option<String>,
    pub students: Vec<Student>,
}

/// Body of `POST /api/classes` and `PUT /api/classes/{id}`
///
/// An empty-string `teacher_id` removes the teacher assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassRequest {
    pub class_name: Option<String>,
    pub grade_level: Option<String>,
    pub section: Option<String>,
    pub teacher_id: Option<IdInput>,
    pub academic_year: Option<String>,
}

/// Validated class column values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInput {
    pub class_name: String,
    pub grade_level: String,
    pub section: Option<String>,
    pub teacher_id: Option<i64>,
    pub academic_year: String,
}

fn resolve_teacher(id: &IdInput) -> Result<Option<i64>, SharedError> {
    match id {
        IdInput::Text(s) if s.trim().is_empty() => Ok(None),
        other => other.resolve("teacher_id").map(Some),
    }
}

impl ClassRequest {
    /// Validate a create request against the calendar year of `today`
    pub fn validate(&self, today: NaiveDate) -> Result<ClassInput, SharedError> {
        require_fields(&[
            ("class_name", has_text(&self.class_name)),
            ("grade_level", has_text(&self.grade_level)),
            ("academic_year", has_text(&self.academic_year)),
        ])?;

        Ok(ClassInput {
            class_name: validation::require_len(
                self.class_name.as_deref().unwrap_or_default(),
                "class_name",
                2,
                50,
            )?,
            grade_level: validation::validate_grade_level(
                self.grade_level.as_deref().unwrap_or_default(),
            )?,
            section: validation::optional_text(self.section.as_deref(), "section", 10)?,
            teacher_id: match &self.teacher_id {
                Some(id) => resolve_teacher(id)?,
                None => None,
            },
            academic_year: validation::validate_academic_year(
                self.academic_year.as_deref().unwrap_or_default(),
                today.year(),
            )?,
        })
    }

    /// Validate an update request, filling omitted fields from `existing`
    pub fn validate_against(&self, existing: &Class, today: NaiveDate) -> Result<ClassInput, SharedError> {
        if self.class_name.is_none()
            && self.grade_level.is_none()
            && self.section.is_none()
            && self.teacher_id.is_none()
            && self.academic_year.is_none()
        {
            return Err(SharedError::EmptyUpdate);
        }

        let grade_level = match self.grade_level.as_deref() {
            None => existing.grade_level.clone(),
            Some(level) => validation::validate_grade_level(level)?,
        };
        let teacher_id = match &self.teacher_id {
            None => existing.teacher_id,
            Some(id) => resolve_teacher(id)?,
        };
        let academic_year = match self.academic_year.as_deref() {
            None => existing.academic_year.clone(),
            Some(year) => validation::validate_academic_year(year, today.year())?,
        };

        Ok(ClassInput {
            class_name: merge_required_text(
                self.class_name.as_deref(),
                existing.class_name.clone(),
                "class_name",
                2,
                50,
            )?,
            grade_level,
            section: merge_optional_text(self.section.as_deref(), existing.section.clone(), "section", 10)?,
            teacher_id,
            academic_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn stored() -> Class {
        let ts = today().and_hms_opt(0, 0, 0).unwrap();
        Class {
            id: 4,
            class_name: "Grade 5 Blue".into(),
            grade_level: "5".into(),
            section: Some("B".into()),
            teacher_id: Some(2),
            teacher_name: Some("Grace".into()),
            academic_year: "2025-2026".into(),
            student_count: 12,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_create_normalizes() {
        let request = ClassRequest {
            class_name: Some(" Kinder A ".into()),
            grade_level: Some("kindergarten".into()),
            section: Some(" A ".into()),
            teacher_id: Some(IdInput::Number(1)),
            academic_year: Some("2025-2026".into()),
        };
        let input = request.validate(today()).unwrap();
        assert_eq!(input.class_name, "Kinder A");
        assert_eq!(input.grade_level, "Kindergarten");
        assert_eq!(input.section.as_deref(), Some("A"));
        assert_eq!(input.teacher_id, Some(1));
    }

    #[test]
    fn test_create_requires_fields() {
        let err = ClassRequest {
            class_name: Some("Grade 1".into()),
            ..Default::default()
        }
        .validate(today())
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: grade_level, academic_year"
        );
    }

    #[test]
    fn test_create_rejects_bad_year() {
        let request = ClassRequest {
            class_name: Some("Grade 1".into()),
            grade_level: Some("1".into()),
            academic_year: Some("2025-2025".into()),
            ..Default::default()
        };
        assert!(request.validate(today()).is_err());
    }

    #[test]
    fn test_update_clears_teacher_and_section() {
        let request = ClassRequest {
            section: Some(String::new()),
            teacher_id: Some(IdInput::Text(String::new())),
            ..Default::default()
        };
        let input = request.validate_against(&stored(), today()).unwrap();
        assert_eq!(input.section, None);
        assert_eq!(input.teacher_id, None);
        assert_eq!(input.class_name, "Grade 5 Blue");
        assert_eq!(input.academic_year, "2025-2026");
    }

    #[test]
    fn test_update_requires_a_field() {
        assert_eq!(
            ClassRequest::default().validate_against(&stored(), today()),
            Err(SharedError::EmptyUpdate)
        );
    }
}
