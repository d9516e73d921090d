//! 内存指标仓库
//!
//! 数据全部保存在进程内，适合测试、基准和本地演示。
//! 分组与排序规则与 SeaORM 后端保持一致。

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Timelike};
use parking_lot::RwLock;
use tracing::debug;

use super::models::{
    BreakdownRow, ClickRecord, DailyCountRow, Dataset, HeatmapRow, LeadRecord, LinkDailyRow,
    LinkRecord, TopLinkRow, UserLinkRow,
};
use super::{MetricsFilter, MetricsRepository, UtmDimension};
use crate::analytics::DateRange;
use crate::errors::{LinkpulseError, Result};

#[derive(Debug, Default)]
pub struct MemoryMetricsRepository {
    data: RwLock<Dataset>,
}

impl MemoryMetricsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            data: RwLock::new(dataset),
        }
    }

    /// 从 JSON 数据集文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinkpulseError::file_operation(format!(
                "Failed to read dataset {}: {}",
                path.display(),
                e
            ))
        })?;
        let dataset: Dataset = serde_json::from_str(&content).map_err(|e| {
            LinkpulseError::serialization(format!(
                "Failed to parse dataset {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(
            "Loaded dataset {}: {} links, {} clicks, {} leads",
            path.display(),
            dataset.links.len(),
            dataset.clicks.len(),
            dataset.leads.len()
        );
        Ok(Self::from_dataset(dataset))
    }

    pub fn insert_link(&self, link: LinkRecord) {
        self.data.write().links.push(link);
    }

    pub fn insert_click(&self, click: ClickRecord) {
        self.data.write().clicks.push(click);
    }

    pub fn insert_lead(&self, lead: LeadRecord) {
        self.data.write().leads.push(lead);
    }

    pub fn snapshot(&self) -> Dataset {
        self.data.read().clone()
    }

    /// 在满足条件的点击上执行 `f`
    fn with_clicks<T>(
        &self,
        filter: &MetricsFilter,
        f: impl FnOnce(&mut dyn Iterator<Item = &ClickRecord>) -> T,
    ) -> T {
        let data = self.data.read();
        let mut matching = data.clicks.iter().filter(|c| {
            c.user_id == filter.user_id
                && filter.link_id.is_none_or(|id| c.link_id == id)
                && filter.range.contains(c.clicked_at)
        });
        f(&mut matching)
    }

    fn breakdown(
        &self,
        filter: &MetricsFilter,
        limit: Option<u64>,
        label: impl Fn(&ClickRecord) -> Option<&str>,
    ) -> Vec<BreakdownRow> {
        let counts = self.with_clicks(filter, |clicks| {
            let mut counts: HashMap<Option<String>, u64> = HashMap::new();
            for click in clicks {
                *counts.entry(label(click).map(str::to_string)).or_insert(0) += 1;
            }
            counts
        });
        sorted_buckets(counts, limit)
    }
}

fn local_day(click: &ClickRecord, range: &DateRange) -> NaiveDate {
    click.clicked_at.with_timezone(&range.offset()).date_naive()
}

/// 次数降序，相同次数按标签升序（未设置排在最前）
fn sorted_buckets(counts: HashMap<Option<String>, u64>, limit: Option<u64>) -> Vec<BreakdownRow> {
    let mut rows: Vec<BreakdownRow> = counts
        .into_iter()
        .map(|(label, count)| BreakdownRow { label, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    if let Some(limit) = limit {
        rows.truncate(limit as usize);
    }
    rows
}

fn utm_value(click: &ClickRecord, dimension: UtmDimension) -> Option<&str> {
    match dimension {
        UtmDimension::Source => click.utm_source.as_deref(),
        UtmDimension::Medium => click.utm_medium.as_deref(),
        UtmDimension::Campaign => click.utm_campaign.as_deref(),
        UtmDimension::Content => click.utm_content.as_deref(),
    }
}

#[async_trait]
impl MetricsRepository for MemoryMetricsRepository {
    async fn count_clicks(&self, filter: &MetricsFilter) -> anyhow::Result<u64> {
        Ok(self.with_clicks(filter, |clicks| clicks.count() as u64))
    }

    async fn count_leads(&self, filter: &MetricsFilter) -> anyhow::Result<u64> {
        let data = self.data.read();
        let count = data
            .leads
            .iter()
            .filter(|l| {
                l.user_id == filter.user_id
                    && filter.link_id.is_none_or(|id| l.link_id == id)
                    && filter.range.contains(l.created_at)
            })
            .count();
        Ok(count as u64)
    }

    async fn clicks_per_day(&self, filter: &MetricsFilter) -> anyhow::Result<Vec<DailyCountRow>> {
        let counts = self.with_clicks(filter, |clicks| {
            let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
            for click in clicks {
                *counts.entry(local_day(click, &filter.range)).or_insert(0) += 1;
            }
            counts
        });

        let mut rows: Vec<DailyCountRow> = counts
            .into_iter()
            .map(|(day, count)| DailyCountRow { day, count })
            .collect();
        rows.sort_by_key(|r| r.day);
        Ok(rows)
    }

    async fn breakdown_by(
        &self,
        filter: &MetricsFilter,
        dimension: UtmDimension,
        limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        Ok(self.breakdown(filter, Some(limit), |c| utm_value(c, dimension)))
    }

    async fn breakdown_by_device(
        &self,
        filter: &MetricsFilter,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        Ok(self.breakdown(filter, None, |c| c.device.as_deref()))
    }

    async fn breakdown_by_referrer(
        &self,
        filter: &MetricsFilter,
        limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        Ok(self.breakdown(filter, Some(limit), |c| c.referrer.as_deref()))
    }

    async fn heatmap(&self, filter: &MetricsFilter) -> anyhow::Result<Vec<HeatmapRow>> {
        let offset = filter.range.offset();
        let counts = self.with_clicks(filter, |clicks| {
            let mut counts: HashMap<(u8, u8), u64> = HashMap::new();
            for click in clicks {
                let local = click.clicked_at.with_timezone(&offset);
                let key = (
                    local.weekday().num_days_from_sunday() as u8,
                    local.hour() as u8,
                );
                *counts.entry(key).or_insert(0) += 1;
            }
            counts
        });

        let mut rows: Vec<HeatmapRow> = counts
            .into_iter()
            .map(|((day_of_week, hour), count)| HeatmapRow {
                day_of_week,
                hour,
                count,
            })
            .collect();
        rows.sort_by_key(|r| (r.day_of_week, r.hour));
        Ok(rows)
    }

    async fn top_links_by_clicks(
        &self,
        user_id: &str,
        range: &DateRange,
        limit: u64,
    ) -> anyhow::Result<Vec<TopLinkRow>> {
        let data = self.data.read();
        let owned: HashMap<i64, &LinkRecord> = data
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| (l.id, l))
            .collect();

        let mut counts: HashMap<i64, u64> = HashMap::new();
        for click in data.clicks.iter() {
            if owned.contains_key(&click.link_id) && range.contains(click.clicked_at) {
                *counts.entry(click.link_id).or_insert(0) += 1;
            }
        }

        let mut rows: Vec<TopLinkRow> = counts
            .into_iter()
            .filter_map(|(link_id, total_clicks)| {
                owned.get(&link_id).map(|link| TopLinkRow {
                    link_id,
                    slug: link.slug.clone(),
                    total_clicks,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_clicks
                .cmp(&a.total_clicks)
                .then_with(|| a.link_id.cmp(&b.link_id))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn clicks_per_day_for_links(
        &self,
        user_id: &str,
        link_ids: &[i64],
        range: &DateRange,
    ) -> anyhow::Result<Vec<LinkDailyRow>> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let data = self.data.read();
        let slugs: HashMap<i64, &str> = data
            .links
            .iter()
            .filter(|l| l.user_id == user_id && link_ids.contains(&l.id))
            .map(|l| (l.id, l.slug.as_str()))
            .collect();

        let mut counts: HashMap<(i64, NaiveDate), u64> = HashMap::new();
        for click in data.clicks.iter() {
            if slugs.contains_key(&click.link_id) && range.contains(click.clicked_at) {
                *counts
                    .entry((click.link_id, local_day(click, range)))
                    .or_insert(0) += 1;
            }
        }

        let mut rows: Vec<LinkDailyRow> = counts
            .into_iter()
            .filter_map(|((link_id, day), count)| {
                slugs.get(&link_id).map(|slug| LinkDailyRow {
                    link_id,
                    slug: (*slug).to_string(),
                    day,
                    count,
                })
            })
            .collect();
        rows.sort_by_key(|r| (r.day, r.link_id));
        Ok(rows)
    }

    async fn user_links(&self, user_id: &str) -> anyhow::Result<Vec<UserLinkRow>> {
        let data = self.data.read();
        let mut rows: Vec<UserLinkRow> = data
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| UserLinkRow {
                id: l.id,
                slug: l.slug.clone(),
                click_count: l.click_count,
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
