use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============ 查询结果 ============

/// 按日计数（报告时区的自然日）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCountRow {
    pub day: NaiveDate,
    pub count: u64,
}

/// 分类计数，`label` 为 `None` 表示该维度未设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub label: Option<String>,
    pub count: u64,
}

/// 星期 × 小时计数（0 = 周日）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapRow {
    pub day_of_week: u8,
    pub hour: u8,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLinkRow {
    pub link_id: i64,
    pub slug: String,
    pub total_clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDailyRow {
    pub link_id: i64,
    pub slug: String,
    pub day: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLinkRow {
    pub id: i64,
    pub slug: String,
    pub click_count: u64,
}

// ============ 原始记录（内存后端 / 数据集文件） ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i64,
    pub user_id: String,
    pub slug: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub click_count: u64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickRecord {
    pub id: i64,
    pub link_id: i64,
    pub user_id: String,
    pub clicked_at: DateTime<Utc>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
    #[serde(default)]
    pub utm_content: Option<String>,
    /// 设备代码：MOBILE / DESKTOP / TABLET / OTHER
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: i64,
    pub link_id: i64,
    pub user_id: String,
    #[serde(default)]
    pub click_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// JSON 数据集（`memory` 后端的初始数据）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    #[serde(default)]
    pub clicks: Vec<ClickRecord>,
    #[serde(default)]
    pub leads: Vec<LeadRecord>,
}
