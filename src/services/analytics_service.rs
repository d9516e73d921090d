//! Analytics service layer
//!
//! 把 dashboard 请求编排为两阶段查询：
//!
//! - 第一阶段：所有互不依赖的查询（总数、序列、分类、热力图、top links）并发执行
//! - 第二阶段：拿到 top links 的 id 后，再查询它们的逐日点击
//!
//! 任意一个查询失败，整个请求失败，不返回部分结果。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Offset, Utc};
use tracing::{debug, info, warn};

use crate::analytics::{
    DashboardAnalytics, DashboardTrends, DateRangeResolver, LabelLocale, Period,
    PeriodPair, TOP_LINKS_LIMIT, UserLink, UtmBreakdown, build_link_comparison, calculate_trend,
    conversion_rate, device_breakdown, fill_daily_series, fill_heatmap, referrer_breakdown,
    utm_breakdown,
};
use crate::config::AnalyticsConfig;
use crate::errors::{LinkpulseError, Result};
use crate::storage::{MetricsFilter, MetricsRepository, UtmDimension};

/// 每个 UTM 维度返回的桶数
pub const UTM_LIMIT: u64 = 10;

/// 来源排行返回的桶数
pub const REFERRER_LIMIT: u64 = 10;

// ============ 服务配置 ============

/// 聚合服务的运行参数
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsSettings {
    pub resolver: DateRangeResolver,
    pub locale: LabelLocale,
    pub max_period_days: u32,
    pub default_period_days: u32,
    /// 整次聚合的超时，`None` 表示不限制
    pub query_timeout: Option<Duration>,
}

impl AnalyticsSettings {
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        Ok(Self {
            resolver: DateRangeResolver::from_offset_minutes(config.utc_offset_minutes)?,
            locale: config.label_locale,
            max_period_days: config.max_period_days,
            default_period_days: config.default_period_days,
            query_timeout: (config.query_timeout_secs > 0)
                .then(|| Duration::from_secs(config.query_timeout_secs)),
        })
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        let config = AnalyticsConfig::default();
        Self {
            resolver: DateRangeResolver::new(Utc.fix()),
            locale: config.label_locale,
            max_period_days: config.max_period_days,
            default_period_days: config.default_period_days,
            query_timeout: None,
        }
    }
}

// ============ AnalyticsService ============

/// Analytics 服务
pub struct AnalyticsService {
    repository: Arc<dyn MetricsRepository>,
    settings: AnalyticsSettings,
}

impl AnalyticsService {
    /// 创建 AnalyticsService 实例
    pub fn new(repository: Arc<dyn MetricsRepository>, settings: AnalyticsSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.repository.backend_name()
    }

    /// 解析周期标记；未提供时使用默认周期
    pub fn parse_period(&self, token: Option<&str>) -> Result<Period> {
        match token {
            Some(token) => Period::parse(token, self.settings.max_period_days),
            None => Period::days(self.settings.default_period_days),
        }
    }

    /// 获取 dashboard 数据（以当前时间为准）
    pub async fn get_dashboard(
        &self,
        user_id: &str,
        link_id: Option<i64>,
        period: Period,
    ) -> Result<DashboardAnalytics> {
        self.get_dashboard_at(user_id, link_id, period, Utc::now())
            .await
    }

    /// 获取 dashboard 数据（以 `now` 为"今天"）
    pub async fn get_dashboard_at(
        &self,
        user_id: &str,
        link_id: Option<i64>,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<DashboardAnalytics> {
        info!(
            "Analytics: get_dashboard user={}, link={:?}, period={}",
            user_id, link_id, period
        );

        if user_id.trim().is_empty() {
            return Err(LinkpulseError::validation("user_id must not be empty"));
        }

        let pair = self.settings.resolver.resolve_at(period, now)?;

        match self.settings.query_timeout {
            Some(limit) => tokio::time::timeout(limit, self.aggregate(user_id, link_id, pair))
                .await
                .map_err(|_| {
                    warn!(
                        "Analytics: dashboard aggregation for user {} exceeded {:?}",
                        user_id, limit
                    );
                    LinkpulseError::repository_failure(format!(
                        "Dashboard query timed out after {}s",
                        limit.as_secs()
                    ))
                })?,
            None => self.aggregate(user_id, link_id, pair).await,
        }
    }

    async fn aggregate(
        &self,
        user_id: &str,
        link_id: Option<i64>,
        pair: PeriodPair,
    ) -> Result<DashboardAnalytics> {
        let repo = &self.repository;
        let current = MetricsFilter::new(user_id, link_id, pair.current);
        let previous = current.with_range(pair.previous);

        // 第一阶段：互不依赖的查询并发执行，首个错误即取消其余查询
        let (
            clicks,
            previous_clicks,
            leads,
            previous_leads,
            daily,
            utm_source,
            utm_medium,
            utm_campaign,
            utm_content,
            devices,
            referrers,
            heatmap,
            top_links,
        ) = tokio::try_join!(
            repo.count_clicks(&current),
            repo.count_clicks(&previous),
            repo.count_leads(&current),
            repo.count_leads(&previous),
            repo.clicks_per_day(&current),
            repo.breakdown_by(&current, UtmDimension::Source, UTM_LIMIT),
            repo.breakdown_by(&current, UtmDimension::Medium, UTM_LIMIT),
            repo.breakdown_by(&current, UtmDimension::Campaign, UTM_LIMIT),
            repo.breakdown_by(&current, UtmDimension::Content, UTM_LIMIT),
            repo.breakdown_by_device(&current),
            repo.breakdown_by_referrer(&current, REFERRER_LIMIT),
            repo.heatmap(&current),
            repo.top_links_by_clicks(user_id, &pair.current, TOP_LINKS_LIMIT),
        )
        .map_err(|e| {
            LinkpulseError::repository_failure(format!("Dashboard query failed: {}", e))
        })?;

        // 第二阶段：top links 的逐日点击
        let link_daily = if top_links.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<i64> = top_links.iter().map(|link| link.link_id).collect();
            repo.clicks_per_day_for_links(user_id, &ids, &pair.current)
                .await
                .map_err(|e| {
                    LinkpulseError::repository_failure(format!(
                        "Link comparison query failed: {}",
                        e
                    ))
                })?
        };

        let locale = self.settings.locale;
        let current_rate = conversion_rate(leads, clicks);
        let previous_rate = conversion_rate(previous_leads, previous_clicks);

        let link_comparison =
            build_link_comparison(&top_links, &link_daily, &pair.current, locale);

        let dashboard = DashboardAnalytics {
            period: pair,
            link_id,
            total_clicks: clicks,
            total_leads: leads,
            conversion_rate: current_rate,
            trends: DashboardTrends {
                clicks: calculate_trend(clicks as f64, previous_clicks as f64),
                leads: calculate_trend(leads as f64, previous_leads as f64),
                conversion_rate: calculate_trend(current_rate, previous_rate),
            },
            clicks_over_time: fill_daily_series(&daily, &pair.current, locale),
            utm: UtmBreakdown {
                source: utm_breakdown(utm_source),
                medium: utm_breakdown(utm_medium),
                campaign: utm_breakdown(utm_campaign),
                content: utm_breakdown(utm_content),
            },
            devices: device_breakdown(devices),
            referrers: referrer_breakdown(referrers),
            heatmap: fill_heatmap(&heatmap),
            link_comparison,
        };

        debug!(
            "Analytics: get_dashboard returned {} clicks, {} leads, {} days, {} compared links",
            dashboard.total_clicks,
            dashboard.total_leads,
            dashboard.clicks_over_time.len(),
            dashboard.link_comparison.links.len()
        );

        Ok(dashboard)
    }

    /// 获取用户的链接列表（dashboard 筛选器）
    pub async fn list_user_links(&self, user_id: &str) -> Result<Vec<UserLink>> {
        info!("Analytics: list_user_links user={}", user_id);

        if user_id.trim().is_empty() {
            return Err(LinkpulseError::validation("user_id must not be empty"));
        }

        let rows = self.repository.user_links(user_id).await.map_err(|e| {
            LinkpulseError::repository_failure(format!("User links query failed: {}", e))
        })?;

        let links: Vec<UserLink> = rows
            .into_iter()
            .map(|row| UserLink {
                id: row.id,
                slug: row.slug,
                click_count: row.click_count,
            })
            .collect();

        debug!("Analytics: list_user_links returned {} links", links.len());
        Ok(links)
    }
}
