//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for linkpulse using clap's derive macros.

use clap::{Parser, Subcommand};

/// Linkpulse - analytics aggregation for tracked short links
#[derive(Parser)]
#[command(name = "linkpulse")]
#[command(version)]
#[command(about = "Analytics aggregation service for tracked short links", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml, optional)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run one dashboard aggregation and print it as JSON
    Report {
        /// User id owning the links
        #[arg(long)]
        user: String,

        /// Period token, e.g. 7d, 30d (default: analytics.default_period_days)
        #[arg(long)]
        period: Option<String>,

        /// Restrict the report to a single link
        #[arg(long)]
        link: Option<i64>,

        /// Pretty-print the JSON payload
        #[arg(long)]
        pretty: bool,
    },

    /// List a user's links
    Links {
        /// User id owning the links
        #[arg(long)]
        user: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
