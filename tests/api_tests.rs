//! HTTP API 集成测试
//!
//! 使用 actix_web::test 直接驱动路由，仓库为内存实现或注入失败的测试仓库。

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use linkpulse::api::services::AppStartTime;
use linkpulse::runtime::modes::configure_routes;
use linkpulse::services::{AnalyticsService, AnalyticsSettings};
use linkpulse::storage::MetricsRepository;

use common::{FailingRepository, memory_repository};

const PREFIX: &str = "/api/v1";

/// 周期上限放宽，让 2024 年的固定数据集落在 "今天" 往前的窗口内
fn wide_settings() -> AnalyticsSettings {
    AnalyticsSettings {
        max_period_days: 10_000,
        ..AnalyticsSettings::default()
    }
}

macro_rules! init_app {
    ($repository:expr) => {{
        let repository: Arc<dyn MetricsRepository> = $repository;
        let service = Arc::new(AnalyticsService::new(repository.clone(), wide_settings()));
        test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .app_data(web::Data::new(repository))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(configure_routes(PREFIX.to_string())),
        )
        .await
    }};
}

#[actix_rt::test]
async fn test_dashboard_ok() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get()
        .uri(&format!("{}/analytics/u1?period=5000d", PREFIX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "OK");

    let data = &body["data"];
    assert_eq!(data["total_clicks"], 7);
    assert_eq!(data["total_leads"], 2);
    assert_eq!(data["conversion_rate"], 28.6);
    assert_eq!(data["period"]["days"], 5000);
    assert_eq!(data["clicks_over_time"].as_array().unwrap().len(), 5000);
    assert_eq!(data["heatmap"].as_array().unwrap().len(), 168);
    assert_eq!(data["link_comparison"]["links"][0]["slug"], "promo");
    assert_eq!(data["link_comparison"]["links"][0]["color"], "#25D366");
}

#[actix_rt::test]
async fn test_dashboard_single_link() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get()
        .uri(&format!("{}/analytics/u1?period=5000d&link_id=2", PREFIX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["link_id"], 2);
    assert_eq!(body["data"]["total_clicks"], 1);
    assert_eq!(body["data"]["conversion_rate"], 0.0);
}

#[actix_rt::test]
async fn test_dashboard_default_period() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get()
        .uri(&format!("{}/analytics/u1", PREFIX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["period"]["days"], 30);
    assert_eq!(
        body["data"]["clicks_over_time"].as_array().unwrap().len(),
        30
    );
}

#[actix_rt::test]
async fn test_dashboard_invalid_period() {
    let app = init_app!(memory_repository());

    for period in ["0d", "abc", "-7d", "20000d"] {
        let req = test::TestRequest::get()
            .uri(&format!("{}/analytics/u1?period={}", PREFIX, period))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "period {}", period);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 6001);
        assert!(body.get("data").is_none());
    }
}

#[actix_rt::test]
async fn test_dashboard_repository_failure() {
    let app = init_app!(Arc::new(FailingRepository { fail_on: "heatmap" }));

    let req = test::TestRequest::get()
        .uri(&format!("{}/analytics/u1?period=7d", PREFIX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6000);
    assert!(body["message"].as_str().unwrap().contains("heatmap"));
    assert!(body.get("data").is_none());
}

#[actix_rt::test]
async fn test_list_links() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get()
        .uri(&format!("{}/analytics/u1/links", PREFIX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let links = body["data"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["slug"], "promo");
    assert_eq!(links[0]["click_count"], 120);
}

#[actix_rt::test]
async fn test_health_ok() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(
        body["data"]["checks"]["storage"]["backend"]["storage_type"],
        "memory"
    );
}

#[actix_rt::test]
async fn test_health_unhealthy() {
    let app = init_app!(Arc::new(FailingRepository { fail_on: "ping" }));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1030);
    assert_eq!(body["data"]["status"], "unhealthy");
    assert!(
        body["data"]["checks"]["storage"]["error"]
            .as_str()
            .unwrap()
            .contains("ping")
    );
}

#[actix_rt::test]
async fn test_liveness() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn test_unknown_route() {
    let app = init_app!(memory_repository());

    let req = test::TestRequest::get()
        .uri(&format!("{}/unknown", PREFIX))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
