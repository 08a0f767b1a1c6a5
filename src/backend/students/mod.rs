//! Students
//!
//! Enrollment records with generated student codes. Deletion is soft by
//! default; a separate endpoint removes the row for good.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use handlers::{
    active_students, create_student, delete_student, get_student, hard_delete_student, inactive_students,
    list_students, search_students, students_by_class, update_student,
};
