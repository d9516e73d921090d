//! 分类统计转换：UTM、设备、来源
//!
//! 注意三者对"未设置"值的处理不同：
//! - UTM：`None` 行直接丢弃
//! - 设备：`None` 归入 `OTHER`（显示为 "Outro"）
//! - 来源：`None` / 空串归入 "Direct"

use serde::Serialize;
use ts_rs::TS;
use url::Url;

use super::TS_EXPORT_PATH;
use super::trend::round1;
use crate::storage::BreakdownRow;

/// 无来源时的显示名
pub const DIRECT_REFERRER: &str = "Direct";

/// 设备代码 → 显示名
const DEVICE_LABELS: [(&str, &str); 4] = [
    ("MOBILE", "Mobile"),
    ("DESKTOP", "Desktop"),
    ("TABLET", "Tablet"),
    ("OTHER", "Outro"),
];

/// UTM 维度统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UtmStat {
    pub source: String,
    pub clicks: u64,
}

/// 设备统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DeviceStat {
    pub device: String,
    pub clicks: u64,
}

/// 来源统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ReferrerStat {
    pub domain: String,
    pub clicks: u64,
    pub percentage: f64,
}

/// UTM 维度：丢弃未设置的值，保留存储层的排序
pub fn utm_breakdown(rows: Vec<BreakdownRow>) -> Vec<UtmStat> {
    rows.into_iter()
        .filter_map(|row| {
            row.label.map(|source| UtmStat {
                source,
                clicks: row.count,
            })
        })
        .collect()
}

/// 设备代码的显示名，未知代码原样返回
pub fn device_label(code: Option<&str>) -> String {
    let code = match code.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => "OTHER",
    };

    DEVICE_LABELS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| code.to_string())
}

/// 设备维度：映射显示名，同名合并
pub fn device_breakdown(rows: Vec<BreakdownRow>) -> Vec<DeviceStat> {
    merge_buckets(
        rows.into_iter()
            .map(|row| (device_label(row.label.as_deref()), row.count)),
    )
    .into_iter()
    .map(|(device, clicks)| DeviceStat { device, clicks })
    .collect()
}

/// 从来源 URL 提取域名（去掉前导 `www.`）
///
/// 无法解析为 URL 但包含 `.` 的字符串按裸域名处理，其余归入 "Direct"。
pub fn referrer_domain(referrer: Option<&str>) -> String {
    let raw = match referrer.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return DIRECT_REFERRER.to_string(),
    };

    if let Ok(url) = Url::parse(raw)
        && let Some(host) = url.host_str()
        && !host.is_empty()
    {
        return strip_www(host).to_string();
    }

    if raw.contains('.') {
        let bare = raw.split('/').next().unwrap_or(raw).to_ascii_lowercase();
        let domain = strip_www(&bare);
        if !domain.is_empty() {
            return domain.to_string();
        }
    }

    DIRECT_REFERRER.to_string()
}

/// 来源维度：按域名合并并计算占比
///
/// 占比的分母是本次返回的所有桶之和（通常是 top 10），不是周期内的总点击数。
pub fn referrer_breakdown(rows: Vec<BreakdownRow>) -> Vec<ReferrerStat> {
    let buckets = merge_buckets(
        rows.into_iter()
            .map(|row| (referrer_domain(row.label.as_deref()), row.count)),
    );
    let total: u64 = buckets.iter().map(|(_, clicks)| clicks).sum();

    buckets
        .into_iter()
        .map(|(domain, clicks)| ReferrerStat {
            domain,
            clicks,
            percentage: if total > 0 {
                round1(clicks as f64 / total as f64 * 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// 同名桶合并：保留首次出现的位置，再按次数稳定降序
fn merge_buckets(items: impl Iterator<Item = (String, u64)>) -> Vec<(String, u64)> {
    let mut merged: Vec<(String, u64)> = Vec::new();
    for (label, count) in items {
        match merged.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, total)) => *total += count,
            None => merged.push((label, count)),
        }
    }
    merged.sort_by(|a, b| b.1.cmp(&a.1));
    merged
}
