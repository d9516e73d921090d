//! Dashboard 端点
//!
//! 用户身份由上游网关解析后放在路径里，这里不做认证。

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::services::AnalyticsService;

use super::helpers::{api_result, error_from_linkpulse};
use super::types::DashboardQuery;

/// Analytics API 处理器
pub struct AnalyticsApi;

impl AnalyticsApi {
    /// GET /analytics/{user_id}
    pub async fn get_dashboard(
        path: web::Path<String>,
        query: web::Query<DashboardQuery>,
        service: web::Data<Arc<AnalyticsService>>,
    ) -> actix_web::Result<HttpResponse> {
        let user_id = path.into_inner();
        trace!(
            "Received dashboard request: user={}, query={:?}",
            user_id, query
        );

        let period = match service.parse_period(query.period.as_deref()) {
            Ok(period) => period,
            Err(e) => return Ok(error_from_linkpulse(&e)),
        };

        Ok(api_result(
            service
                .get_dashboard(&user_id, query.link_id, period)
                .await,
        ))
    }

    /// GET /analytics/{user_id}/links
    pub async fn list_links(
        path: web::Path<String>,
        service: web::Data<Arc<AnalyticsService>>,
    ) -> actix_web::Result<HttpResponse> {
        let user_id = path.into_inner();
        trace!("Received link list request: user={}", user_id);

        Ok(api_result(service.list_user_links(&user_id).await))
    }
}
