//! Attendance
//!
//! Daily records per student, bulk submission, per-student history and
//! monthly summaries, and per-class daily and monthly reports.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use handlers::{
    class_attendance_on_date, class_report, delete_attendance, list_attendance, mark_attendance,
    mark_bulk_attendance, student_history, student_summary, update_attendance,
};
