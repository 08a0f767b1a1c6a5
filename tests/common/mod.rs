//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory database fixtures
//! - Seed helpers for each resource
//! - A test HTTP server over the full router
//! - Envelope assertions

#![allow(dead_code)]

pub mod assertions;
pub mod database;
pub mod fixtures;

// Re-export commonly used utilities
pub use assertions::*;
pub use database::*;
pub use fixtures::*;
