//! CLI interface module
//!
//! This module provides command-line interface functionality for linkpulse.

pub mod commands;

use std::fmt;

use crate::errors::LinkpulseError;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LinkpulseError> for CliError {
    fn from(err: LinkpulseError) -> Self {
        match err {
            LinkpulseError::InvalidPeriod(_) | LinkpulseError::Validation(_) => {
                CliError::ParseError(err.message().to_string())
            }
            LinkpulseError::RepositoryFailure(_)
            | LinkpulseError::DatabaseConfig(_)
            | LinkpulseError::DatabaseConnection(_)
            | LinkpulseError::DatabaseOperation(_) => CliError::StorageError(err.to_string()),
            _ => CliError::CommandError(err.to_string()),
        }
    }
}
