//! Dashboard 响应载荷

use serde::Serialize;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};
use ts_rs::TS;

use super::TS_EXPORT_PATH;
use super::breakdown::{DeviceStat, ReferrerStat, UtmStat};
use super::comparison::LinkComparison;
use super::filler::{DailyClicks, HeatmapCell};
use super::period::PeriodPair;
use super::trend::TrendResult;

/// 三项核心指标的环比
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DashboardTrends {
    pub clicks: TrendResult,
    pub leads: TrendResult,
    /// 由两个周期的转化率计算，而非点击 / 线索数
    pub conversion_rate: TrendResult,
}

/// 四个 UTM 维度
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UtmBreakdown {
    pub source: Vec<UtmStat>,
    pub medium: Vec<UtmStat>,
    pub campaign: Vec<UtmStat>,
    pub content: Vec<UtmStat>,
}

/// 可独立显示空状态的图表区块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, EnumIter, AsRefStr)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DashboardSection {
    ClicksOverTime,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmContent,
    Devices,
    Referrers,
    Heatmap,
    LinkComparison,
}

/// 一次 dashboard 请求的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DashboardAnalytics {
    pub period: PeriodPair,
    pub link_id: Option<i64>,
    pub total_clicks: u64,
    pub total_leads: u64,
    pub conversion_rate: f64,
    pub trends: DashboardTrends,
    pub clicks_over_time: Vec<DailyClicks>,
    pub utm: UtmBreakdown,
    pub devices: Vec<DeviceStat>,
    pub referrers: Vec<ReferrerStat>,
    pub heatmap: Vec<HeatmapCell>,
    pub link_comparison: LinkComparison,
}

impl DashboardAnalytics {
    /// 没有任何数据的区块
    ///
    /// 序列和热力图长度固定，全为 0 时视为空。
    pub fn empty_sections(&self) -> Vec<DashboardSection> {
        DashboardSection::iter()
            .filter(|section| self.is_section_empty(*section))
            .collect()
    }

    pub fn is_section_empty(&self, section: DashboardSection) -> bool {
        match section {
            DashboardSection::ClicksOverTime => self.clicks_over_time.iter().all(|p| p.clicks == 0),
            DashboardSection::UtmSource => self.utm.source.is_empty(),
            DashboardSection::UtmMedium => self.utm.medium.is_empty(),
            DashboardSection::UtmCampaign => self.utm.campaign.is_empty(),
            DashboardSection::UtmContent => self.utm.content.is_empty(),
            DashboardSection::Devices => self.devices.is_empty(),
            DashboardSection::Referrers => self.referrers.is_empty(),
            DashboardSection::Heatmap => self.heatmap.iter().all(|c| c.value == 0),
            DashboardSection::LinkComparison => self.link_comparison.is_empty(),
        }
    }
}

/// 链接筛选器中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserLink {
    pub id: i64,
    pub slug: String,
    pub click_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_names() {
        assert_eq!(DashboardSection::ClicksOverTime.as_ref(), "clicks_over_time");
        assert_eq!(DashboardSection::LinkComparison.as_ref(), "link_comparison");
        assert_eq!(
            serde_json::to_string(&DashboardSection::UtmCampaign).unwrap(),
            "\"utm_campaign\""
        );
        assert_eq!(DashboardSection::iter().count(), 9);
    }
}
