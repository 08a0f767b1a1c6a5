/**
 * Error Conversion
 *
 * This module provides conversion implementations for backend errors:
 * classification of `sqlx` failures and rendering as HTTP responses.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "success": false,
 *   "error": "Error message",
 *   "details": ["optional", "per-item", "lines"]
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;
use crate::shared::ErrorBody;

impl From<sqlx::Error> for BackendError {
    /// Classify a driver error
    ///
    /// Constraint violations raised by the store are the backstop for the
    /// checks repositories run before writing; they still map to the same
    /// client-facing categories.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                tracing::debug!("Unique constraint violated: {}", db_err.message());
                return BackendError::conflict("A record with the same unique values already exists");
            }
            if db_err.is_foreign_key_violation() {
                tracing::debug!("Foreign key constraint violated: {}", db_err.message());
                return BackendError::InvalidReference {
                    message: "A referenced record does not exist".to_string(),
                };
            }
            if db_err.is_check_violation() {
                tracing::debug!("Check constraint violated: {}", db_err.message());
                return BackendError::validation("A value is outside its allowed range");
            }
        }
        BackendError::DatabaseError(err)
    }
}

impl IntoResponse for BackendError {
    /// Convert a backend error into an HTTP response
    ///
    /// Client errors are logged at `warn`; database failures are logged at
    /// `error` with the driver message, which never reaches the client.
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            BackendError::DatabaseError(err) => {
                tracing::error!("Database error while handling request: {:?}", err);
            }
            other => {
                tracing::warn!(status = status.as_u16(), "Request rejected: {}", other);
            }
        }

        let body = ErrorBody::new(self.message(), self.details());
        (status, Json(body)).into_response()
    }
}
