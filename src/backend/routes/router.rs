/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Routes
 *
 * 1. `GET /` - plain-text welcome
 * 2. `GET /health` - database reachability
 * 3. `/api/...` - resource endpoints (see `api_routes`)
 * 4. Fallback - JSON 404 envelope
 */

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ping;
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, ErrorBody};

/// Body of a healthy `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state holding the connection pool
///
/// # Returns
///
/// Router with every route configured, without CORS or trace layers
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check));

    let router = configure_api_routes(router);

    router.fallback(not_found).with_state(app_state)
}

async fn welcome() -> &'static str {
    "Welcome to the rollbook school records API"
}

/// Report whether the database answers a trivial query
async fn health_check(
    State(pool): State<SqlitePool>,
) -> Result<Json<ApiResponse<HealthStatus>>, (StatusCode, Json<ErrorBody>)> {
    match ping(&pool).await {
        Ok(()) => Ok(Json(ApiResponse::ok(HealthStatus {
            status: "ok",
            database: "connected",
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody::new("Database is unreachable", None)),
            ))
        }
    }
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Route not found", None)))
}
