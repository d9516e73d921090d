//! Service layer for business logic
//!
//! This module provides the aggregation logic shared between the HTTP API
//! and the CLI report commands.

mod analytics_service;

pub use analytics_service::*;
