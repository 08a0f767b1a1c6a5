//! Rollbook - School Records Service
//!
//! Rollbook keeps the records of a school: subjects, teachers, classes,
//! students and daily attendance. It exposes them through a JSON REST API
//! backed by SQLite.
//!
//! # Module Structure
//!
//! - **`shared`** - Types and pure logic
//!   - Domain rows, request bodies and validated inputs
//!   - Input validation and normalization
//!   - Response envelopes, error types, configuration
//!
//! - **`backend`** - The HTTP service
//!   - Axum router, handlers and error responses
//!   - Per-resource repositories over a `SqlitePool`
//!   - Embedded migrations and server bootstrap
//!
//! # Usage
//!
//! ```rust,no_run
//! use rollbook::backend::server::{config, init::create_app};
//! use rollbook::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app_config = AppConfig::from_env()?;
//! let pool = config::connect(&app_config).await?;
//! config::run_migrations(&pool).await?;
//! let app = create_app(pool, &app_config);
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for rejected input
//! - `backend::error::BackendError` for everything a handler can return;
//!   it renders itself as a `{success: false, error}` response

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
