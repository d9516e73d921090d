//! Mode routing
//!
//! This module provides unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (one-shot report commands)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export mode functions for convenience
#[cfg(feature = "server")]
pub use server::{configure_routes, run_server};

#[cfg(feature = "cli")]
pub use cli::run_cli;
