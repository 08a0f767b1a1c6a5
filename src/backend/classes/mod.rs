//! Classes
//!
//! A class belongs to one academic year and has at most one teacher. The
//! detail view lists the enrolled students.

pub mod db;
pub mod handlers;

pub use handlers::{classes_by_teacher, create_class, delete_class, get_class, list_classes, update_class};
