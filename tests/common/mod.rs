//! 集成测试共用的数据集与仓库
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use linkpulse::analytics::DateRange;
use linkpulse::services::{AnalyticsService, AnalyticsSettings};
use linkpulse::storage::{
    BreakdownRow, ClickRecord, DailyCountRow, Dataset, HeatmapRow, LeadRecord, LinkDailyRow,
    LinkRecord, MemoryMetricsRepository, MetricsFilter, MetricsRepository, TopLinkRow,
    UserLinkRow, UtmDimension,
};

/// 固定的"现在"：2024-06-15 12:00 UTC（周六）
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}

pub fn link(id: i64, user_id: &str, slug: &str, click_count: u64) -> LinkRecord {
    LinkRecord {
        id,
        user_id: user_id.to_string(),
        slug: slug.to_string(),
        target_url: format!("https://example.com/{}", slug),
        click_count,
        created_at: at(1, 0),
    }
}

pub fn click(id: i64, link_id: i64, user_id: &str, clicked_at: DateTime<Utc>) -> ClickRecord {
    ClickRecord {
        id,
        link_id,
        user_id: user_id.to_string(),
        clicked_at,
        referrer: None,
        utm_source: None,
        utm_medium: None,
        utm_campaign: None,
        utm_content: None,
        device: None,
    }
}

pub fn lead(id: i64, link_id: i64, user_id: &str, created_at: DateTime<Utc>) -> LeadRecord {
    LeadRecord {
        id,
        link_id,
        user_id: user_id.to_string(),
        click_id: None,
        created_at,
    }
}

/// u1 拥有 promo(1) 和 blog(2)，u2 拥有 other(3)
///
/// 7 天周期（06-09..06-15）内 u1 有 4 次点击、1 个 lead；
/// 上一周期（06-02..06-08）有 2 次点击、1 个 lead。
pub fn sample_dataset() -> Dataset {
    let mut c1 = click(1, 1, "u1", at(10, 10));
    c1.utm_source = Some("google".to_string());
    c1.utm_medium = Some("cpc".to_string());
    c1.device = Some("MOBILE".to_string());
    c1.referrer = Some("https://www.google.com/search".to_string());

    let mut c2 = click(2, 1, "u1", at(10, 11));
    c2.utm_source = Some("google".to_string());
    c2.device = Some("mobile".to_string());

    let mut c3 = click(3, 1, "u1", at(12, 9));
    c3.utm_source = Some("facebook".to_string());
    c3.device = Some("DESKTOP".to_string());
    c3.referrer = Some("https://facebook.com/x".to_string());

    let mut c4 = click(4, 2, "u1", at(15, 8));
    c4.referrer = Some("https://www.google.com/".to_string());

    Dataset {
        links: vec![
            link(1, "u1", "promo", 120),
            link(2, "u1", "blog", 7),
            link(3, "u2", "other", 50),
        ],
        clicks: vec![
            c1,
            c2,
            c3,
            c4,
            // 上一周期
            click(5, 1, "u1", at(5, 10)),
            click(6, 1, "u1", at(5, 10)),
            // 其他用户
            click(7, 3, "u2", at(10, 10)),
            // 周期之外
            click(8, 1, "u1", at(1, 10)),
        ],
        leads: vec![
            lead(1, 1, "u1", at(10, 12)),
            lead(2, 1, "u1", at(5, 12)),
            lead(3, 3, "u2", at(10, 12)),
        ],
    }
}

pub fn memory_repository() -> Arc<MemoryMetricsRepository> {
    Arc::new(MemoryMetricsRepository::from_dataset(sample_dataset()))
}

pub fn service_with(repository: Arc<dyn MetricsRepository>) -> AnalyticsService {
    AnalyticsService::new(repository, AnalyticsSettings::default())
}

/// 指定方法失败的仓库，其余方法返回空结果
pub struct FailingRepository {
    pub fail_on: &'static str,
}

impl FailingRepository {
    fn check(&self, method: &str) -> anyhow::Result<()> {
        if self.fail_on == method || self.fail_on == "*" {
            anyhow::bail!("{} failed: connection reset", method);
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsRepository for FailingRepository {
    async fn count_clicks(&self, _filter: &MetricsFilter) -> anyhow::Result<u64> {
        self.check("count_clicks")?;
        Ok(10)
    }

    async fn count_leads(&self, _filter: &MetricsFilter) -> anyhow::Result<u64> {
        self.check("count_leads")?;
        Ok(1)
    }

    async fn clicks_per_day(&self, _filter: &MetricsFilter) -> anyhow::Result<Vec<DailyCountRow>> {
        self.check("clicks_per_day")?;
        Ok(Vec::new())
    }

    async fn breakdown_by(
        &self,
        _filter: &MetricsFilter,
        _dimension: UtmDimension,
        _limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.check("breakdown_by")?;
        Ok(Vec::new())
    }

    async fn breakdown_by_device(
        &self,
        _filter: &MetricsFilter,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.check("breakdown_by_device")?;
        Ok(Vec::new())
    }

    async fn breakdown_by_referrer(
        &self,
        _filter: &MetricsFilter,
        _limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.check("breakdown_by_referrer")?;
        Ok(Vec::new())
    }

    async fn heatmap(&self, _filter: &MetricsFilter) -> anyhow::Result<Vec<HeatmapRow>> {
        self.check("heatmap")?;
        Ok(Vec::new())
    }

    async fn top_links_by_clicks(
        &self,
        _user_id: &str,
        _range: &DateRange,
        _limit: u64,
    ) -> anyhow::Result<Vec<TopLinkRow>> {
        self.check("top_links_by_clicks")?;
        Ok(vec![TopLinkRow {
            link_id: 1,
            slug: "promo".to_string(),
            total_clicks: 10,
        }])
    }

    async fn clicks_per_day_for_links(
        &self,
        _user_id: &str,
        _link_ids: &[i64],
        _range: &DateRange,
    ) -> anyhow::Result<Vec<LinkDailyRow>> {
        self.check("clicks_per_day_for_links")?;
        Ok(Vec::new())
    }

    async fn user_links(&self, _user_id: &str) -> anyhow::Result<Vec<UserLinkRow>> {
        self.check("user_links")?;
        Ok(Vec::new())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.check("ping")
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

/// 永不返回的仓库（测试超时）
pub struct StalledRepository;

#[async_trait]
impl MetricsRepository for StalledRepository {
    async fn count_clicks(&self, _filter: &MetricsFilter) -> anyhow::Result<u64> {
        std::future::pending().await
    }

    async fn count_leads(&self, _filter: &MetricsFilter) -> anyhow::Result<u64> {
        Ok(0)
    }

    async fn clicks_per_day(&self, _filter: &MetricsFilter) -> anyhow::Result<Vec<DailyCountRow>> {
        Ok(Vec::new())
    }

    async fn breakdown_by(
        &self,
        _filter: &MetricsFilter,
        _dimension: UtmDimension,
        _limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        Ok(Vec::new())
    }

    async fn breakdown_by_device(
        &self,
        _filter: &MetricsFilter,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        Ok(Vec::new())
    }

    async fn breakdown_by_referrer(
        &self,
        _filter: &MetricsFilter,
        _limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        Ok(Vec::new())
    }

    async fn heatmap(&self, _filter: &MetricsFilter) -> anyhow::Result<Vec<HeatmapRow>> {
        Ok(Vec::new())
    }

    async fn top_links_by_clicks(
        &self,
        _user_id: &str,
        _range: &DateRange,
        _limit: u64,
    ) -> anyhow::Result<Vec<TopLinkRow>> {
        Ok(Vec::new())
    }

    async fn clicks_per_day_for_links(
        &self,
        _user_id: &str,
        _link_ids: &[i64],
        _range: &DateRange,
    ) -> anyhow::Result<Vec<LinkDailyRow>> {
        Ok(Vec::new())
    }

    async fn user_links(&self, _user_id: &str) -> anyhow::Result<Vec<UserLinkRow>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &str {
        "stalled"
    }
}

/// 第一阶段的并发查询数（与 AnalyticsService 的 try_join! 一致）
pub const PHASE_ONE_CALLS: usize = 13;

/// 第一阶段每个查询都在同一个 Barrier 上等待：
/// 只有全部查询同时在途才会放行，顺序 await 会永远卡住。
/// 同时记录 top links 返回与逐日序列开始的先后顺序。
pub struct BarrierRepository {
    barrier: tokio::sync::Barrier,
    events: parking_lot::Mutex<Vec<&'static str>>,
}

impl BarrierRepository {
    pub fn new() -> Self {
        Self {
            barrier: tokio::sync::Barrier::new(PHASE_ONE_CALLS),
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().clone()
    }

    fn record(&self, event: &'static str) {
        self.events.lock().push(event);
    }

    async fn rendezvous(&self) {
        self.barrier.wait().await;
    }
}

#[async_trait]
impl MetricsRepository for BarrierRepository {
    async fn count_clicks(&self, _filter: &MetricsFilter) -> anyhow::Result<u64> {
        self.rendezvous().await;
        Ok(10)
    }

    async fn count_leads(&self, _filter: &MetricsFilter) -> anyhow::Result<u64> {
        self.rendezvous().await;
        Ok(1)
    }

    async fn clicks_per_day(&self, _filter: &MetricsFilter) -> anyhow::Result<Vec<DailyCountRow>> {
        self.rendezvous().await;
        Ok(Vec::new())
    }

    async fn breakdown_by(
        &self,
        _filter: &MetricsFilter,
        _dimension: UtmDimension,
        _limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.rendezvous().await;
        Ok(Vec::new())
    }

    async fn breakdown_by_device(
        &self,
        _filter: &MetricsFilter,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.rendezvous().await;
        Ok(Vec::new())
    }

    async fn breakdown_by_referrer(
        &self,
        _filter: &MetricsFilter,
        _limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.rendezvous().await;
        Ok(Vec::new())
    }

    async fn heatmap(&self, _filter: &MetricsFilter) -> anyhow::Result<Vec<HeatmapRow>> {
        self.rendezvous().await;
        Ok(Vec::new())
    }

    async fn top_links_by_clicks(
        &self,
        _user_id: &str,
        _range: &DateRange,
        _limit: u64,
    ) -> anyhow::Result<Vec<TopLinkRow>> {
        self.rendezvous().await;
        self.record("top_links_returned");
        Ok(vec![TopLinkRow {
            link_id: 1,
            slug: "promo".to_string(),
            total_clicks: 10,
        }])
    }

    async fn clicks_per_day_for_links(
        &self,
        _user_id: &str,
        _link_ids: &[i64],
        _range: &DateRange,
    ) -> anyhow::Result<Vec<LinkDailyRow>> {
        self.record("link_series_started");
        Ok(Vec::new())
    }

    async fn user_links(&self, _user_id: &str) -> anyhow::Result<Vec<UserLinkRow>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &str {
        "barrier"
    }
}
