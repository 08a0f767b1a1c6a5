//! Backend Error Module
//!
//! This module defines the error type returned by repositories and HTTP
//! handlers, and how it is rendered as a response.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - sqlx classification and IntoResponse
//! ```
//!
//! # HTTP Response Conversion
//!
//! `BackendError` implements `IntoResponse`, so handlers return
//! `Result<_, BackendError>` and use `?` on repository calls. The status
//! code is chosen by variant; handlers never inspect message text.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
