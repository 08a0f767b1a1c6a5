//! Backend Module
//!
//! This module contains all server-side code for rollbook: the Axum HTTP
//! server, the route table, and one module per school resource.
//!
//! # Architecture
//!
//! - **`server`** - Connection pool setup, migrations, application state, app assembly
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`subjects`**, **`teachers`**, **`classes`**, **`students`**, **`attendance`** -
//!   each with a `db` module (SQL operations) and a `handlers` module (HTTP)
//! - **`repository`** - Existence checks and query-building helpers shared by the `db` modules
//! - **`extract`** - Request extractors
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Pool, migrations, state, app assembly
//! ├── routes/         - Route configuration
//! ├── error/          - Error types and HTTP conversion
//! ├── repository.rs   - Shared query helpers
//! ├── extract.rs      - JSON extractor
//! ├── subjects/
//! ├── teachers/
//! ├── classes/
//! ├── students/
//! └── attendance/
//! ```
//!
//! # State Management
//!
//! The only shared state is the `SqlitePool` inside `AppState`. Handlers
//! take it with `State<SqlitePool>`; every repository function receives it
//! explicitly. Writes that issue more than one statement run inside a
//! transaction.
//!
//! # Error Handling
//!
//! Repositories and handlers return `Result<_, BackendError>`. The error's
//! variant chooses the HTTP status and the `{success: false, error}` body.
//!
//! # Example
//!
//! ```rust,no_run
//! use rollbook::backend::server::{config, create_app};
//! use rollbook::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app_config = AppConfig::from_env()?;
//! let pool = config::connect(&app_config).await?;
//! config::run_migrations(&pool).await?;
//! let app = create_app(pool, &app_config);
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Request extractors
pub mod extract;

/// Shared repository helpers
pub mod repository;

/// Subject catalogue
pub mod subjects;

/// Teachers
pub mod teachers;

/// Classes
pub mod classes;

/// Students
pub mod students;

/// Attendance records and reports
pub mod attendance;

/// Re-export commonly used types
pub use error::BackendError;
pub use routes::create_router;
pub use server::{create_app, AppState};
