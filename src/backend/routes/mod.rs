//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Router assembly, the welcome and health endpoints, fallback
//! - **`api_routes`** - The `/api` resource endpoints
//!
//! # Route Order
//!
//! Within each resource, fixed-segment paths (`/search`, `/active`,
//! `/subject/{id}`, ...) are registered before the `/{id}` catch-all so the
//! intent of each route is readable top to bottom.

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
