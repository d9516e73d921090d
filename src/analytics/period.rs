//! 统计周期解析
//!
//! 把 "最近 N 天" 这样的周期选择解析为具体的时间边界：
//! 当前周期 + 紧邻其前、等长的上一周期（用于环比）。
//!
//! 所有边界都按整天对齐：`start` 为当天 00:00:00.000，
//! `end` 为当天 23:59:59.999（报告时区由 UTC offset 决定）。
//! `end` 只用于展示；过滤按半开区间 `[start, 次日 00:00)` 进行，
//! 亚毫秒精度的时间戳也不会落在两个周期之间。

use std::str::FromStr;

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::TS_EXPORT_PATH;
use crate::errors::{LinkpulseError, Result};

/// 未配置时允许的最大周期天数
pub const DEFAULT_MAX_PERIOD_DAYS: u32 = 365;

/// 时间范围，总是覆盖完整的自然日（`end` 为展示用的闭区间终点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    /// 以 `first` 和 `last` 两个自然日（含）构造范围
    pub fn for_days(first: NaiveDate, last: NaiveDate, offset: FixedOffset) -> Result<Self> {
        if first > last {
            return Err(LinkpulseError::validation(format!(
                "Range start {} is after range end {}",
                first, last
            )));
        }
        Ok(Self {
            start: start_of_day(first, offset),
            end: end_of_day(last, offset),
        })
    }

    /// 单日范围
    pub fn single_day(day: NaiveDate, offset: FixedOffset) -> Self {
        Self {
            start: start_of_day(day, offset),
            end: end_of_day(day, offset),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn offset(&self) -> FixedOffset {
        *self.start.offset()
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// 最后一天之后的 00:00（不含），过滤用的上界
    pub fn end_exclusive_utc(&self) -> DateTime<Utc> {
        (start_of_day(self.last_day(), self.offset()) + Duration::days(1)).with_timezone(&Utc)
    }

    /// 范围内的自然日数量
    pub fn day_count(&self) -> usize {
        (self.last_day() - self.first_day()).num_days() as usize + 1
    }

    /// 按时间顺序遍历范围内的每一个自然日
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last_day();
        std::iter::successors(Some(self.first_day()), |d| d.succ_opt())
            .take_while(move |d| *d <= last)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start_utc() && ts < self.end_exclusive_utc()
    }
}

/// 当前周期与上一周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PeriodPair {
    pub days: u32,
    pub current: DateRange,
    pub previous: DateRange,
}

/// 周期天数（N >= 1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period(u32);

impl Period {
    pub fn days(days: u32) -> Result<Self> {
        if days == 0 {
            return Err(LinkpulseError::invalid_period(
                "Period must cover at least one day",
            ));
        }
        Ok(Self(days))
    }

    /// 解析周期标记，支持 `30`、`30d`、`30D`
    pub fn parse(token: &str, max_days: u32) -> Result<Self> {
        let trimmed = token.trim();
        let digits = trimmed
            .strip_suffix('d')
            .or_else(|| trimmed.strip_suffix('D'))
            .unwrap_or(trimmed)
            .trim();

        let days: i64 = digits.parse().map_err(|_| {
            LinkpulseError::invalid_period(format!(
                "Invalid period '{}'. Expected a day count such as '7', '30d' or '90d'",
                token
            ))
        })?;

        if days <= 0 {
            return Err(LinkpulseError::invalid_period(format!(
                "Period must be a positive number of days, got {}",
                days
            )));
        }
        if days > i64::from(max_days) {
            return Err(LinkpulseError::invalid_period(format!(
                "Period of {} days exceeds the maximum of {} days",
                days, max_days
            )));
        }

        Self::days(days as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for Period {
    type Err = LinkpulseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, DEFAULT_MAX_PERIOD_DAYS)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// 把周期解析为时间边界（报告时区固定）
#[derive(Debug, Clone, Copy)]
pub struct DateRangeResolver {
    offset: FixedOffset,
}

impl DateRangeResolver {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// 从分钟数构造，超出 ±24h 时返回错误
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                LinkpulseError::validation(format!("Invalid UTC offset: {} minutes", minutes))
            })?;
        Ok(Self::new(offset))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 以当前时间解析
    pub fn resolve(&self, period: Period) -> Result<PeriodPair> {
        self.resolve_at(period, Utc::now())
    }

    /// 以指定时间点解析
    pub fn resolve_at(&self, period: Period, now: DateTime<Utc>) -> Result<PeriodPair> {
        let today = now.with_timezone(&self.offset).date_naive();
        let n = u64::from(period.get());

        let out_of_range = || {
            LinkpulseError::invalid_period(format!(
                "Period of {} days reaches outside the supported calendar",
                n
            ))
        };

        let current_first = today.checked_sub_days(Days::new(n - 1)).ok_or_else(out_of_range)?;
        let previous_last = today.checked_sub_days(Days::new(n)).ok_or_else(out_of_range)?;
        let previous_first = today
            .checked_sub_days(Days::new(2 * n - 1))
            .ok_or_else(out_of_range)?;

        Ok(PeriodPair {
            days: period.get(),
            current: DateRange::for_days(current_first, today, self.offset)?,
            previous: DateRange::for_days(previous_first, previous_last, self.offset)?,
        })
    }
}

fn start_of_day(day: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = day.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

fn end_of_day(day: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    start_of_day(day, offset) + Duration::days(1) - Duration::milliseconds(1)
}
