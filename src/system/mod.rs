//! System-level modules
//!
//! - Logging initialization (tracing + non-blocking appender)

pub mod logging;

pub use logging::{init_cli_logging, init_logging};
