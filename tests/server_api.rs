//! Router, health, and schema tests

mod common;

use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use common::*;
use pretty_assertions::assert_eq;
use rollbook::backend::server::config::MIGRATOR;
use rollbook::backend::server::init::create_app;
use rollbook::shared::AppConfig;

#[tokio::test]
async fn test_welcome_and_health() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let welcome = server.get("/").await;
    welcome.assert_status_ok();
    assert_eq!(welcome.text(), "Welcome to the rollbook school records API");

    let health = expect_data(&server.get("/health").await, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "connected");
}

#[tokio::test]
async fn test_health_reports_closed_database() {
    let db = TestDatabase::new().await;
    let server = db.server();
    db.pool().close().await;

    let error = expect_error(&server.get("/health").await, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error, "Database is unreachable");
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let db = TestDatabase::new().await;

    let error = expect_error(&db.server().get("/api/lockers").await, StatusCode::NOT_FOUND);
    assert_eq!(error, "Route not found");
}

#[tokio::test]
async fn test_app_allows_configured_origin() {
    let pool = create_test_pool().await;
    let config = AppConfig::builder()
        .cors_allowed_origin("http://localhost:5173")
        .build()
        .unwrap();
    let server = TestServer::new(create_app(pool, &config)).unwrap();

    let response = server
        .get("/health")
        .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.header(ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_every_migration_applied() {
    let db = TestDatabase::new().await;

    let applied: Vec<(i64, bool)> =
        sqlx::query_as("SELECT version, success FROM _sqlx_migrations ORDER BY version")
            .fetch_all(db.pool())
            .await
            .unwrap();
    assert_eq!(applied.len(), MIGRATOR.iter().count());
    assert!(applied.iter().all(|(_, success)| *success));

    for table in ["subjects", "teachers", "classes", "students", "attendance"] {
        assert_eq!(db.row_count(table).await, 0, "{table}");
    }
}
