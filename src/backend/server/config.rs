/**
 * Server Configuration
 *
 * This module opens the SQLite connection pool described by `AppConfig`
 * and applies the embedded schema migrations.
 *
 * # Error Handling
 *
 * Unlike optional services, the database is required: connection and
 * migration failures are returned to the caller and abort startup.
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::shared::AppConfig;

/// Schema migrations compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// How long a request waits for a pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection options with foreign key enforcement enabled
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .foreign_keys(true)
        .create_if_missing(true))
}

/// Create the connection pool and confirm the database answers
///
/// # Errors
///
/// Returns the driver error if the URL is malformed, the file cannot be
/// opened, or the probe query fails.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(&config.database_url)?)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            e
        })?;

    ping(&pool).await?;
    tracing::info!(
        "Database connection pool created (max {} connections)",
        config.max_connections
    );

    Ok(pool)
}

/// Run a trivial query to verify connectivity
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations
///
/// Applied migrations are recorded in the `_sqlx_migrations` table, so
/// running this again is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    tracing::info!("Running database migrations...");
    MIGRATOR.run(pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}
