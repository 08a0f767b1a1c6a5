//! Attendance Data Structures
//!
//! One record per student per calendar day. Records carry the class the
//! student attended under, a status, and free-form remarks.
//!
//! Besides the row types this module defines the report shapes:
//!
//! - [`AttendanceSummary`] - a student's status counts for one month
//! - [`ClassReportRow`] - per-student day counts for a class over one month

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::SharedError;
use crate::shared::school::common::{has_text, require_fields, IdInput, Pagination};
use crate::shared::validation;

/// Largest batch accepted by `POST /api/attendance/bulk`
pub const MAX_BULK_RECORDS: usize = 500;

/// Attendance status for one day
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [(&'static str, AttendanceStatus); 4] = [
        ("present", AttendanceStatus::Present),
        ("absent", AttendanceStatus::Absent),
        ("late", AttendanceStatus::Late),
        ("excused", AttendanceStatus::Excused),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SharedError> {
        validation::parse_choice(value, "status", &Self::ALL)
    }
}

/// An attendance row joined with the student's and class's names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub class_id: i64,
    pub class_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body of `POST /api/attendance`, `PUT /api/attendance/{id}`, and each
/// element of a bulk submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceRequest {
    pub student_id: Option<IdInput>,
    pub class_id: Option<IdInput>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

/// Validated attendance column values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceInput {
    pub student_id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

impl AttendanceRequest {
    /// Validate a new record; status defaults to present
    pub fn validate(&self) -> Result<AttendanceInput, SharedError> {
        require_fields(&[
            ("student_id", self.student_id.is_some()),
            ("class_id", self.class_id.is_some()),
            ("date", has_text(&self.date)),
        ])?;
        self.build()
    }

    /// Validate a full-row replacement; every column except remarks is required
    pub fn validate_replacement(&self) -> Result<AttendanceInput, SharedError> {
        require_fields(&[
            ("student_id", self.student_id.is_some()),
            ("class_id", self.class_id.is_some()),
            ("date", has_text(&self.date)),
            ("status", has_text(&self.status)),
        ])?;
        self.build()
    }

    fn build(&self) -> Result<AttendanceInput, SharedError> {
        let resolve = |id: &Option<IdInput>, field: &str| match id {
            Some(id) => id.resolve(field),
            None => Err(SharedError::missing([field])),
        };

        Ok(AttendanceInput {
            student_id: resolve(&self.student_id, "student_id")?,
            class_id: resolve(&self.class_id, "class_id")?,
            date: validation::parse_date(self.date.as_deref().unwrap_or_default(), "date")?,
            status: match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(status) => AttendanceStatus::parse(status)?,
                None => AttendanceStatus::default(),
            },
            remarks: validation::optional_text(self.remarks.as_deref(), "remarks", 500)?,
        })
    }
}

/// A bulk submission rejected before touching the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRejection {
    pub message: String,
    pub details: Vec<String>,
}

/// Validate every record of a bulk submission
///
/// All failures are collected, each prefixed with its 1-based record
/// number, so the client can fix the whole batch at once.
pub fn validate_bulk(records: &[AttendanceRequest]) -> Result<Vec<AttendanceInput>, BulkRejection> {
    if records.is_empty() {
        return Err(BulkRejection {
            message: "Attendance data must be a non-empty array".to_string(),
            details: Vec::new(),
        });
    }
    if records.len() > MAX_BULK_RECORDS {
        return Err(BulkRejection {
            message: format!("A maximum of {MAX_BULK_RECORDS} records can be submitted at once"),
            details: Vec::new(),
        });
    }

    let mut inputs = Vec::with_capacity(records.len());
    let mut details = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match record.validate() {
            Ok(input) => inputs.push(input),
            Err(err) => details.push(format!("Record {}: {}", index + 1, err)),
        }
    }

    if details.is_empty() {
        Ok(inputs)
    } else {
        Err(BulkRejection {
            message: "Validation failed".to_string(),
            details,
        })
    }
}

/// Query string of `GET /api/attendance`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub date: Option<String>,
    pub class_id: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<String>,
}

/// Validated listing filter; every present field must match exactly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceListQuery {
    pub fn filter(&self) -> Result<AttendanceFilter, SharedError> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(AttendanceFilter {
            date: match non_blank(&self.date) {
                Some(raw) => Some(validation::parse_date(&raw, "date")?),
                None => None,
            },
            class_id: validation::parse_optional_id(self.class_id.as_deref(), "class_id")?,
            student_id: validation::parse_optional_id(self.student_id.as_deref(), "student_id")?,
            status: match non_blank(&self.status) {
                Some(raw) => Some(AttendanceStatus::parse(&raw)?),
                None => None,
            },
        })
    }

    pub fn pagination(&self) -> Result<Option<Pagination>, SharedError> {
        Pagination::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Query string of `GET /api/attendance/student/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl HistoryQuery {
    /// `from` and `to` must be given together, with `from <= to`
    pub fn range(&self) -> Result<Option<DateRange>, SharedError> {
        let from = self.from.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let to = self.to.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (from, to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => {
                let from = validation::parse_date(from, "from")?;
                let to = validation::parse_date(to, "to")?;
                if from > to {
                    return Err(SharedError::validation(
                        "from",
                        "From date cannot be after to date",
                    ));
                }
                Ok(Some(DateRange { from, to }))
            }
            _ => Err(SharedError::validation(
                "from",
                "Both from and to dates are required for date range filtering",
            )),
        }
    }
}

/// Query string of the monthly summary and class report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl MonthQuery {
    pub fn month_year(&self) -> Result<(u32, i32), SharedError> {
        validation::parse_month_year(self.month.as_deref(), self.year.as_deref())
    }
}

/// Number of records with one status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct StatusCount {
    pub status: AttendanceStatus,
    pub count: i64,
}

/// A student's attendance for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub month: u32,
    pub year: i32,
    pub total: i64,
    pub breakdown: Vec<StatusCount>,
}

impl AttendanceSummary {
    pub fn new(student_id: i64, month: u32, year: i32, breakdown: Vec<StatusCount>) -> Self {
        let total = breakdown.iter().map(|c| c.count).sum();
        Self {
            student_id,
            month,
            year,
            total,
            breakdown,
        }
    }

    /// Count for one status, zero when absent from the breakdown
    pub fn count_of(&self, status: AttendanceStatus) -> i64 {
        self.breakdown
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }
}

/// One student's line in a class's monthly report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct ClassReportRow {
    pub student_id: i64,
    pub student_name: String,
    pub student_code: String,
    pub present_days: i64,
    pub absent_days: i64,
    pub late_days: i64,
    pub excused_days: i64,
}
