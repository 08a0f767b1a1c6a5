/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` trait for Axum state extraction.
 *
 * # Architecture
 *
 * The only shared resource is the SQLite connection pool. It is created
 * once at startup, cloned into every handler (clones share the same pool),
 * and closed at shutdown.
 *
 * # Example
 *
 * ```rust
 * use axum::extract::State;
 * use sqlx::SqlitePool;
 *
 * async fn handler(State(pool): State<SqlitePool>) {
 *     // Pass &pool to a repository function
 * }
 * ```
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;

/// Application state shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Implement FromRef for SqlitePool
///
/// This allows Axum handlers to extract the pool directly from `AppState`
/// using `State(SqlitePool)`.
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}
