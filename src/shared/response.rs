//! Response Envelopes
//!
//! Every JSON response is wrapped in an envelope with a `success` flag.
//! Successful list responses add `count`; paginated ones also carry
//! `total`, `page` and `limit`. Failures carry `error` and optional
//! `details`.

use serde::{Deserialize, Serialize};

use crate::shared::school::common::Pagination;

/// Successful response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a single value
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            total: None,
            page: None,
            limit: None,
            data: Some(data),
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A success carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            total: None,
            page: None,
            limit: None,
            data: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wrap an unpaginated list
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        let mut response = Self::ok(items);
        response.count = Some(count);
        response
    }

    /// Wrap a list that may be one page window, without a total
    pub fn window(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        let mut response = Self::list(items);
        if let Some(p) = pagination {
            response.page = Some(p.page);
            response.limit = Some(p.limit);
        }
        response
    }

    /// Wrap one page of a list along with the unpaginated total
    pub fn page(items: Vec<T>, total: i64, pagination: Option<Pagination>) -> Self {
        let mut response = Self::list(items);
        response.total = Some(total);
        if let Some(p) = pagination {
            response.page = Some(p.page);
            response.limit = Some(p.limit);
        }
        response
    }
}

/// Failure envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: details.filter(|d| !d.is_empty()),
        }
    }
}
