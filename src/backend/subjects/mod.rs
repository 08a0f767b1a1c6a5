//! Subjects
//!
//! CRUD over the subject catalogue. A subject cannot be deleted while any
//! teacher is assigned to it.

/// Database operations
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_subject, delete_subject, get_subject, list_subjects, update_subject};
