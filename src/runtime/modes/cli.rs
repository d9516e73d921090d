//! CLI mode
//!
//! Analytics commands go through the same startup path as the server.
//! `config generate` is handled in main before any config is loaded.

use std::sync::Arc;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::interfaces::cli::commands::{list_links, run_report};
use crate::runtime::lifetime;
use crate::services::AnalyticsService;

/// Run one CLI command
pub async fn run_cli(command: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    match command {
        Commands::Report {
            user,
            period,
            link,
            pretty,
        } => {
            let service = analytics_service(&config).await?;
            run_report(&service, user, period, link, pretty).await
        }

        Commands::Links { user } => {
            let service = analytics_service(&config).await?;
            list_links(&service, user).await
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),

        Commands::Config { .. } => Err(CliError::CommandError(
            "config commands run before configuration is loaded".to_string(),
        )),
    }
}

async fn analytics_service(config: &StaticConfig) -> Result<Arc<AnalyticsService>, CliError> {
    let startup = lifetime::prepare_startup(config)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;
    Ok(startup.analytics_service)
}
