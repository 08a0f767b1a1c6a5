//! Shared Error Types
//!
//! Errors raised while validating and normalizing request input. They carry
//! the offending field so handlers can log it, while the display text is the
//! human-readable message returned to clients.
//!
//! # Usage
//!
//! ```rust
//! use rollbook::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email format");
//! assert_eq!(error.to_string(), "Invalid email format");
//! ```
use thiserror::Error;

/// Validation failures detected before any query executes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A single field failed a format, length, range or membership check
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// One or more required fields were absent
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields {
        /// Names of the absent fields, in declaration order
        fields: Vec<String>,
    },

    /// An update request carried no mutable field
    #[error("At least one field must be provided for update")]
    EmptyUpdate,
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing-fields error
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Field name associated with this error, when there is exactly one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::MissingFields { .. } | Self::EmptyUpdate => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("email", "Invalid email format");
        match &error {
            SharedError::ValidationError { field, message } => {
                assert_eq!(field, "email");
                assert_eq!(message, "Invalid email format");
            }
            _ => panic!("Expected ValidationError"),
        }
        assert_eq!(error.field(), Some("email"));
    }

    #[test]
    fn test_missing_fields_display() {
        let error = SharedError::missing(["name", "class_id"]);
        assert_eq!(
            error.to_string(),
            "Missing required fields: name, class_id"
        );
        assert_eq!(error.field(), None);
    }

    #[test]
    fn test_empty_update_display() {
        let display = format!("{}", SharedError::EmptyUpdate);
        assert!(display.contains("At least one field"));
    }

    #[test]
    fn test_error_clone() {
        let error = SharedError::validation("field", "message");
        assert_eq!(error.clone(), error);
    }
}
