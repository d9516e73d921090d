use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{AnalyticsService, AnalyticsSettings};
use crate::storage::{MetricsRepository, StorageFactory};

/// Server 和 CLI 共用的启动上下文
pub struct StartupContext {
    pub repository: Arc<dyn MetricsRepository>,
    pub analytics_service: Arc<AnalyticsService>,
}

/// 创建指标仓库和聚合服务
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let repository = StorageFactory::create(&config.database)
        .await
        .context("Failed to create metrics repository")?;
    info!("Using metrics backend: {}", repository.backend_name());

    let settings = AnalyticsSettings::from_config(&config.analytics)
        .context("Invalid analytics configuration")?;
    info!(
        "Analytics: reporting offset {}, locale {:?}, default period {}d (max {}d)",
        settings.resolver.offset(),
        settings.locale,
        settings.default_period_days,
        settings.max_period_days
    );

    let analytics_service = Arc::new(AnalyticsService::new(repository.clone(), settings));

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());
    Ok(StartupContext {
        repository,
        analytics_service,
    })
}
