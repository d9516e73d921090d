//! 环比趋势与比率计算

use serde::Serialize;
use ts_rs::TS;

use super::TS_EXPORT_PATH;

/// 环比变化
///
/// `value` 始终是变化幅度的绝对值（百分比，一位小数），方向由 `is_positive` 表示。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrendResult {
    pub value: f64,
    pub is_positive: bool,
}

impl TrendResult {
    pub const fn new(value: f64, is_positive: bool) -> Self {
        Self { value, is_positive }
    }
}

/// 四舍五入到一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 计算当前值相对上一周期的变化
///
/// 上一周期为 0 时不计算比例：有增长记为 +100%，否则记为 0%。
/// 持平（current == previous）视为正向。
pub fn calculate_trend(current: f64, previous: f64) -> TrendResult {
    if previous == 0.0 {
        return if current > 0.0 {
            TrendResult::new(100.0, true)
        } else {
            TrendResult::new(0.0, true)
        };
    }

    let change = (current - previous) / previous * 100.0;
    TrendResult::new(round1(change.abs()), change >= 0.0)
}

/// 转化率（百分比，一位小数），无点击时为 0
pub fn conversion_rate(leads: u64, clicks: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    round1(leads as f64 / clicks as f64 * 100.0)
}
