//! 多链接对比序列
//!
//! 取当前周期点击最多的前 K 个链接，生成按日对齐的稠密序列：
//! 每一行都包含全部选中链接的 slug，缺失补 0。

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::TS_EXPORT_PATH;
use super::filler::{LabelLocale, day_label};
use super::period::DateRange;
use crate::storage::{LinkDailyRow, TopLinkRow};

/// 参与对比的链接数量
pub const TOP_LINKS_LIMIT: u64 = 5;

/// 图例配色，按链接序号循环使用
pub const PALETTE: [&str; 6] = [
    "#25D366", "#3B82F6", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899",
];

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// 图例项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ComparedLink {
    pub id: i64,
    pub slug: String,
    pub color: String,
    pub total_clicks: u64,
}

/// 某一天各链接的点击数（slug → clicks）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LinkComparisonRow {
    pub date: NaiveDate,
    pub label: String,
    pub values: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LinkComparison {
    pub links: Vec<ComparedLink>,
    pub rows: Vec<LinkComparisonRow>,
}

impl LinkComparison {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// 图例：保留存储层给出的排名顺序
pub fn compared_links(top: &[TopLinkRow]) -> Vec<ComparedLink> {
    top.iter()
        .enumerate()
        .map(|(index, link)| ComparedLink {
            id: link.link_id,
            slug: link.slug.clone(),
            color: color_for(index).to_string(),
            total_clicks: link.total_clicks,
        })
        .collect()
}

/// 组装对比序列
///
/// `daily` 中不属于 `top` 的链接会被忽略；日期超出范围的行同样忽略。
pub fn build_link_comparison(
    top: &[TopLinkRow],
    daily: &[LinkDailyRow],
    range: &DateRange,
    locale: LabelLocale,
) -> LinkComparison {
    let links = compared_links(top);
    let slug_by_id: HashMap<i64, &str> = links.iter().map(|l| (l.id, l.slug.as_str())).collect();

    let mut counts: HashMap<(NaiveDate, &str), u64> = HashMap::with_capacity(daily.len());
    for row in daily {
        if let Some(slug) = slug_by_id.get(&row.link_id) {
            *counts.entry((row.day, *slug)).or_insert(0) += row.count;
        }
    }

    let rows = range
        .days()
        .map(|day| LinkComparisonRow {
            date: day,
            label: day_label(day, locale),
            values: links
                .iter()
                .map(|link| {
                    let clicks = counts
                        .get(&(day, link.slug.as_str()))
                        .copied()
                        .unwrap_or(0);
                    (link.slug.clone(), clicks)
                })
                .collect(),
        })
        .collect();

    LinkComparison { links, rows }
}
