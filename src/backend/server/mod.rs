//! Server Module
//!
//! This module contains the code that brings the HTTP service up: opening
//! the database, applying migrations, and assembling the router.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Connection pool and migrations
//! └── init.rs         - Router assembly with CORS and tracing layers
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AppConfig::from_env`
//! 2. **Database**: `config::connect`, then `config::run_migrations`
//! 3. **Router Creation**: `init::create_app`

/// Application state management
pub mod state;

/// Database pool and migrations
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::AppState;
