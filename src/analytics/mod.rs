//! 分析聚合的纯计算部分
//!
//! 这里的函数都是同步的，不访问存储：输入是存储层返回的稀疏行，
//! 输出是可以直接交给图表的稠密结构。
//!
//! - `period`：周期 → 当前 / 上一周期时间边界
//! - `trend`：环比与转化率
//! - `filler`：逐日序列与 7×24 热力图补全
//! - `breakdown`：UTM / 设备 / 来源分类统计
//! - `comparison`：多链接对比序列
//! - `dashboard`：最终响应载荷

pub mod breakdown;
pub mod comparison;
pub mod dashboard;
pub mod filler;
pub mod period;
pub mod trend;

/// TypeScript 类型输出路径（dashboard 前端）
pub const TS_EXPORT_PATH: &str = "../dashboard/src/types/analytics.generated.ts";

pub use breakdown::{
    DIRECT_REFERRER, DeviceStat, ReferrerStat, UtmStat, device_breakdown, device_label,
    referrer_breakdown, referrer_domain, utm_breakdown,
};
pub use comparison::{
    ComparedLink, LinkComparison, LinkComparisonRow, PALETTE, TOP_LINKS_LIMIT,
    build_link_comparison, color_for,
};
pub use dashboard::{DashboardAnalytics, DashboardSection, DashboardTrends, UserLink, UtmBreakdown};
pub use filler::{
    DailyClicks, HEATMAP_CELLS, HeatmapCell, LabelLocale, day_label, fill_daily_series,
    fill_heatmap,
};
pub use period::{DEFAULT_MAX_PERIOD_DAYS, DateRange, DateRangeResolver, Period, PeriodPair};
pub use trend::{TrendResult, calculate_trend, conversion_rate, round1};
