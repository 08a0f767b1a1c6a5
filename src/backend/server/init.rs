/**
 * Server Initialization
 *
 * This module assembles the Axum application from an open connection pool:
 * application state, the route table, request tracing, and CORS.
 *
 * # Initialization Process
 *
 * 1. Wrap the pool in `AppState`
 * 2. Build the router with every resource's routes
 * 3. Add the CORS and HTTP trace layers
 *
 * Opening the pool and running migrations happen before this, in the
 * binary's `main` (see `server::config`).
 */

use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `pool` - Open, migrated connection pool
/// * `config` - Application configuration (CORS origin)
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_app(pool: SqlitePool, config: &AppConfig) -> Router<()> {
    tracing::info!("Initializing rollbook backend server");

    let app_state = AppState::new(pool);
    let app = create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(config.cors_allowed_origin.as_deref())),
    );

    tracing::info!("Router configured");
    app
}

/// CORS policy: a single allowed origin when configured, otherwise any
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => {
            tracing::info!("CORS restricted to {:?}", value);
            layer.allow_origin(value)
        }
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid CORS_ALLOWED_ORIGIN ({}); allowing any origin", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
