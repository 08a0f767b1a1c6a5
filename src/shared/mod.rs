//! Shared Module
//!
//! Types and pure logic that do not depend on the HTTP layer: domain rows
//! and request bodies, input validation, response envelopes, errors and
//! configuration.
//!
//! # Overview
//!
//! Everything here can be unit-tested without a database or a running
//! server. The backend builds on these types; integration tests use them to
//! decode responses.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Input validation and normalization
pub mod validation;

/// JSON response envelopes
pub mod response;

/// Subjects, teachers, classes, students and attendance
pub mod school;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use response::{ApiResponse, ErrorBody};
