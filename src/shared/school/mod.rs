//! School Record Types
//!
//! Rows, request bodies and validated inputs for the five resources the
//! service manages. Each request body exposes `validate` for creation and
//! `validate_against(existing)` for merging an update onto a stored row.

/// Identifier coercion, pagination and update-merge helpers
pub mod common;

/// Subjects taught at the school
pub mod subject;

/// Teachers and their employment status
pub mod teacher;

/// Classes per academic year
pub mod class;

/// Students, enrollment status and student codes
pub mod student;

/// Daily attendance and monthly reports
pub mod attendance;

pub use attendance::{
    AttendanceFilter, AttendanceInput, AttendanceRecord, AttendanceRequest, AttendanceStatus,
    AttendanceSummary, ClassReportRow, DateRange, StatusCount,
};
pub use class::{Class, ClassDetail, ClassInput, ClassRequest};
pub use common::{IdInput, PageQuery, Pagination, SearchQuery};
pub use student::{Gender, Student, StudentDetail, StudentFilter, StudentInput, StudentRequest, StudentStatus};
pub use subject::{Subject, SubjectInput, SubjectRequest};
pub use teacher::{Teacher, TeacherInput, TeacherRequest, TeacherStatus};
