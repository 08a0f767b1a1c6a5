//! Database test fixtures and utilities
//!
//! Every fixture owns a private in-memory SQLite database with all
//! migrations applied, so tests never share rows.

use axum_test::TestServer;
use rollbook::backend::routes::create_router;
use rollbook::backend::server::config::{connect_options, MIGRATOR};
use rollbook::backend::server::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Create a migrated in-memory connection pool
///
/// The pool holds exactly one connection that never expires: each SQLite
/// in-memory connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
    let options = connect_options("sqlite::memory:").expect("Invalid test database URL");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test database pool");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Test database fixture
pub struct TestDatabase {
    pool: SqlitePool,
}

impl TestDatabase {
    /// Create a new test database fixture
    pub async fn new() -> Self {
        Self {
            pool: create_test_pool().await,
        }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// An HTTP test server over the full router, sharing this database
    pub fn server(&self) -> TestServer {
        TestServer::new(create_router(AppState::new(self.pool.clone())))
            .expect("Failed to create test server")
    }

    /// Number of rows in `table`
    pub async fn row_count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows");
        count
    }
}
