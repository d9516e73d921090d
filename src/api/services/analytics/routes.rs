//! Analytics API 路由配置

use actix_web::web;

use super::dashboard::AnalyticsApi;

/// 分析路由 `/analytics`
///
/// 包含：
/// - GET /analytics/{user_id} - dashboard 聚合数据
/// - GET /analytics/{user_id}/links - 用户链接列表（筛选器）
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .route("/{user_id}/links", web::get().to(AnalyticsApi::list_links))
        .route("/{user_id}", web::get().to(AnalyticsApi::get_dashboard))
}
