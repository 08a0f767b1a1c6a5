//! Request extractors
//!
//! `ValidJson` behaves like `axum::Json` but reports a malformed or
//! mistyped body through `BackendError`, so clients get the usual
//! `{success: false, error}` envelope with status 400.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;

/// JSON body extractor with envelope-shaped rejections
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> BackendError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be JSON (Content-Type: application/json)".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body".to_string(),
        JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
        _ => "Invalid request body".to_string(),
    };
    tracing::debug!("Rejected JSON body: {}", rejection.body_text());
    BackendError::validation(message)
}
