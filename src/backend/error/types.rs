/**
 * Backend Error Types
 *
 * This module defines the errors a request handler or repository can
 * return. Each variant maps to one HTTP status code.
 *
 * # Error Categories
 *
 * - `ValidationError` / `SharedError` - rejected input (400)
 * - `NotFound` / `MissingReferences` / `InvalidReference` - target or
 *   referenced row absent (404)
 * - `Conflict` - uniqueness or dependency rule violated (409)
 * - `DatabaseError` - unexpected store failure (500)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::school::attendance::BulkRejection;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use rollbook::backend::error::BackendError;
///
/// let err = BackendError::not_found("Student", 42);
/// assert_eq!(err.message(), "Student with ID 42 does not exist");
///
/// let err = BackendError::conflict("Email a@b.co already exists");
/// assert_eq!(err.status_code().as_u16(), 409);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request-level validation failure with optional per-item details
    #[error("{message}")]
    ValidationError {
        message: String,
        details: Vec<String>,
    },

    /// Field validation raised by the shared validators
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// The addressed row, or a single referenced row, does not exist
    #[error("{entity} with ID {id} does not exist")]
    NotFound {
        entity: &'static str,
        id: i64,
    },

    /// Several referenced rows do not exist
    ///
    /// `entity` is the plural noun, e.g. `"Students"`.
    #[error("{entity} with IDs {} do not exist", join_ids(.ids))]
    MissingReferences {
        entity: &'static str,
        ids: Vec<i64>,
    },

    /// A foreign key rejected by the store itself
    #[error("{message}")]
    InvalidReference { message: String },

    /// Uniqueness or dependency conflict
    #[error("{message}")]
    Conflict { message: String },

    /// Unexpected database failure
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl BackendError {
    /// Create a validation error without details
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create a validation error carrying one line per rejected item
    pub fn validation_with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn missing_references(entity: &'static str, ids: Vec<i64>) -> Self {
        Self::MissingReferences { entity, ids }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `ValidationError`, `SharedError` - 400 Bad Request
    /// - `NotFound`, `MissingReferences`, `InvalidReference` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - `DatabaseError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } | Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. }
            | Self::MissingReferences { .. }
            | Self::InvalidReference { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients
    ///
    /// Database failures are reduced to a generic message; the driver text
    /// only goes to the log.
    pub fn message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "An unexpected database error occurred".to_string(),
            other => other.to_string(),
        }
    }

    /// Per-item details, when the error carries any
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::ValidationError { details, .. } if !details.is_empty() => Some(details.clone()),
            _ => None,
        }
    }
}

impl From<BulkRejection> for BackendError {
    fn from(rejection: BulkRejection) -> Self {
        Self::validation_with_details(rejection.message, rejection.details)
    }
}
