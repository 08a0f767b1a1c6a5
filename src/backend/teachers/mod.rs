//! Teachers
//!
//! CRUD, search and lookup by subject or status. A teacher cannot be deleted
//! while any class names them as its teacher.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use handlers::{
    active_teachers, create_teacher, delete_teacher, get_teacher, inactive_teachers, list_teachers,
    search_teachers, teachers_by_subject, update_teacher,
};
