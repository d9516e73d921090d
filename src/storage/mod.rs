//! 指标存储
//!
//! `MetricsRepository` 是聚合服务访问原始点击 / 线索数据的唯一入口。
//! 实现方负责过滤、分组与排序；按日 / 按小时分组使用 `filter.range` 携带的时区偏移。

use std::sync::Arc;

use async_trait::async_trait;
use strum::{AsRefStr, EnumIter};
use tracing::info;

use crate::analytics::DateRange;
use crate::config::DatabaseConfig;
use crate::errors::{LinkpulseError, Result};

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::{SeaOrmMetricsRepository, infer_backend_from_url};
pub use memory::MemoryMetricsRepository;
pub use models::{
    BreakdownRow, ClickRecord, DailyCountRow, Dataset, HeatmapRow, LeadRecord, LinkDailyRow,
    LinkRecord, TopLinkRow, UserLinkRow,
};

/// 查询条件：用户 + 可选链接 + 时间范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsFilter {
    pub user_id: String,
    pub link_id: Option<i64>,
    pub range: DateRange,
}

impl MetricsFilter {
    pub fn new(user_id: impl Into<String>, link_id: Option<i64>, range: DateRange) -> Self {
        Self {
            user_id: user_id.into(),
            link_id,
            range,
        }
    }

    /// 同一用户 / 链接，换一个时间范围
    pub fn with_range(&self, range: DateRange) -> Self {
        Self {
            user_id: self.user_id.clone(),
            link_id: self.link_id,
            range,
        }
    }
}

/// UTM 维度（`as_ref()` 即列名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
pub enum UtmDimension {
    #[strum(serialize = "utm_source")]
    Source,
    #[strum(serialize = "utm_medium")]
    Medium,
    #[strum(serialize = "utm_campaign")]
    Campaign,
    #[strum(serialize = "utm_content")]
    Content,
}

/// 指标查询契约
///
/// 所有分类查询按次数降序返回；次数相同时按标签 / 链接 id 升序。
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    async fn count_clicks(&self, filter: &MetricsFilter) -> anyhow::Result<u64>;

    async fn count_leads(&self, filter: &MetricsFilter) -> anyhow::Result<u64>;

    /// 只返回有点击的日期
    async fn clicks_per_day(&self, filter: &MetricsFilter) -> anyhow::Result<Vec<DailyCountRow>>;

    async fn breakdown_by(
        &self,
        filter: &MetricsFilter,
        dimension: UtmDimension,
        limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>>;

    async fn breakdown_by_device(&self, filter: &MetricsFilter)
    -> anyhow::Result<Vec<BreakdownRow>>;

    async fn breakdown_by_referrer(
        &self,
        filter: &MetricsFilter,
        limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>>;

    async fn heatmap(&self, filter: &MetricsFilter) -> anyhow::Result<Vec<HeatmapRow>>;

    async fn top_links_by_clicks(
        &self,
        user_id: &str,
        range: &DateRange,
        limit: u64,
    ) -> anyhow::Result<Vec<TopLinkRow>>;

    async fn clicks_per_day_for_links(
        &self,
        user_id: &str,
        link_ids: &[i64],
        range: &DateRange,
    ) -> anyhow::Result<Vec<LinkDailyRow>>;

    async fn user_links(&self, user_id: &str) -> anyhow::Result<Vec<UserLinkRow>>;

    /// 健康检查探针
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// 按 `database_url` 选择后端；`memory` 使用内存仓库（可从 `dataset_path` 加载）
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn MetricsRepository>> {
        let database_url = config.database_url.trim();

        if database_url.eq_ignore_ascii_case("memory") {
            let repository = match config.dataset_path.as_deref() {
                Some(path) if !path.is_empty() => MemoryMetricsRepository::from_json_file(path)?,
                _ => MemoryMetricsRepository::new(),
            };
            info!("Using in-memory metrics repository");
            return Ok(Arc::new(repository));
        }

        if database_url.is_empty() {
            return Err(LinkpulseError::database_config("database_url is not set"));
        }

        // 从 URL 自动推断数据库类型
        let backend_type = infer_backend_from_url(database_url)?;
        let repository = SeaOrmMetricsRepository::new(config, &backend_type).await?;
        Ok(Arc::new(repository))
    }
}
