//! Linkpulse - analytics aggregation for tracked short links
//!
//! This library turns raw click / lead records into the dashboard payload
//! of a link-tracking service: totals with period-over-period trends,
//! gap-filled daily series, UTM / device / referrer breakdowns, a weekly
//! heatmap and a multi-link comparison.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `analytics`: Pure transformations (periods, trends, fillers, breakdowns)
//! - `storage`: Metrics repository contract and backends (SeaORM, memory)
//! - `services`: Aggregation orchestration
//! - `api`: HTTP services
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application startup and execution modes
//! - `system`: Logging

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
