//! 时间序列补零与热力图补全
//!
//! 存储层只返回有数据的桶；图表需要稠密序列，缺失的日期 / 时段补 0。

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::TS_EXPORT_PATH;
use super::period::DateRange;
use crate::storage::{DailyCountRow, HeatmapRow};

/// 一周天数 × 一天小时数
pub const HEATMAP_DAYS: u8 = 7;
pub const HEATMAP_HOURS: u8 = 24;
pub const HEATMAP_CELLS: usize = HEATMAP_DAYS as usize * HEATMAP_HOURS as usize;

const MONTHS_PT_BR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 日期标签语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelLocale {
    #[default]
    #[serde(rename = "pt-BR", alias = "pt-br", alias = "pt")]
    PtBr,
    #[serde(rename = "en", alias = "en-US")]
    En,
}

impl LabelLocale {
    fn months(self) -> &'static [&'static str; 12] {
        match self {
            Self::PtBr => &MONTHS_PT_BR,
            Self::En => &MONTHS_EN,
        }
    }
}

/// 短日期标签，如 `5 Mar`
pub fn day_label(day: NaiveDate, locale: LabelLocale) -> String {
    format!("{} {}", day.day(), locale.months()[day.month0() as usize])
}

/// 每日点击（稠密序列中的一项）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub label: String,
    pub clicks: u64,
}

/// 热力图单元格（day_of_week: 0 = 周日）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HeatmapCell {
    pub day: u8,
    pub hour: u8,
    pub value: u64,
}

/// 把稀疏的 (日期 → 次数) 补全为范围内逐日的序列
///
/// 输出长度恒等于范围内的自然日数，按日期升序；同一天的多行会累加。
pub fn fill_daily_series(
    samples: &[DailyCountRow],
    range: &DateRange,
    locale: LabelLocale,
) -> Vec<DailyClicks> {
    let lookup = index_by_day(samples);

    range
        .days()
        .map(|day| DailyClicks {
            date: day,
            label: day_label(day, locale),
            clicks: lookup.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// 按日期聚合，供多个补全逻辑复用
pub(crate) fn index_by_day(samples: &[DailyCountRow]) -> HashMap<NaiveDate, u64> {
    let mut lookup: HashMap<NaiveDate, u64> = HashMap::with_capacity(samples.len());
    for sample in samples {
        *lookup.entry(sample.day).or_insert(0) += sample.count;
    }
    lookup
}

/// 补全 7 × 24 热力图
///
/// 外层按星期（0..6），内层按小时（0..23）；越界的输入被忽略。
pub fn fill_heatmap(samples: &[HeatmapRow]) -> Vec<HeatmapCell> {
    let mut grid = [[0u64; HEATMAP_HOURS as usize]; HEATMAP_DAYS as usize];

    for sample in samples {
        if sample.day_of_week < HEATMAP_DAYS && sample.hour < HEATMAP_HOURS {
            grid[sample.day_of_week as usize][sample.hour as usize] += sample.count;
        }
    }

    let mut cells = Vec::with_capacity(HEATMAP_CELLS);
    for day in 0..HEATMAP_DAYS {
        for hour in 0..HEATMAP_HOURS {
            cells.push(HeatmapCell {
                day,
                hour,
                value: grid[day as usize][hour as usize],
            });
        }
    }
    cells
}
