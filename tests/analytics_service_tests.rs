//! AnalyticsService 集成测试
//!
//! 使用内存仓库覆盖完整的 dashboard 载荷，
//! 以及仓库失败 / 超时时的错误传播。

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use linkpulse::analytics::{DashboardSection, LabelLocale, Period, TrendResult};
use linkpulse::errors::LinkpulseError;
use linkpulse::services::{AnalyticsService, AnalyticsSettings};

use common::{
    BarrierRepository, FailingRepository, StalledRepository, fixed_now, memory_repository,
    service_with,
};

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn seven_days() -> Period {
    Period::days(7).unwrap()
}

// =============================================================================
// 完整载荷
// =============================================================================

#[cfg(test)]
mod dashboard_tests {
    use super::*;

    #[tokio::test]
    async fn test_totals_and_trends() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        assert_eq!(dashboard.total_clicks, 4);
        assert_eq!(dashboard.total_leads, 1);
        assert_eq!(dashboard.conversion_rate, 25.0);

        // 4 vs 2 点击
        assert_eq!(dashboard.trends.clicks, TrendResult::new(100.0, true));
        // 1 vs 1 lead
        assert_eq!(dashboard.trends.leads, TrendResult::new(0.0, true));
        // 25% vs 50%
        assert_eq!(dashboard.trends.conversion_rate, TrendResult::new(50.0, false));
    }

    #[tokio::test]
    async fn test_periods_are_contiguous() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        let period = dashboard.period;
        assert_eq!(period.days, 7);
        assert_eq!(period.current.first_day(), june(9));
        assert_eq!(period.current.last_day(), june(15));
        assert_eq!(period.previous.first_day(), june(2));
        assert_eq!(period.previous.last_day(), june(8));
    }

    #[tokio::test]
    async fn test_clicks_over_time_is_dense() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        let series = &dashboard.clicks_over_time;
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, june(9));
        assert_eq!(series[6].date, june(15));

        let clicks: Vec<u64> = series.iter().map(|p| p.clicks).collect();
        assert_eq!(clicks, vec![0, 2, 0, 1, 0, 0, 1]);
        assert_eq!(series[1].label, "10 Jun");
    }

    #[tokio::test]
    async fn test_breakdowns() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        let sources: Vec<(&str, u64)> = dashboard
            .utm
            .source
            .iter()
            .map(|s| (s.source.as_str(), s.clicks))
            .collect();
        assert_eq!(sources, vec![("google", 2), ("facebook", 1)]);

        // 未设置的 UTM 值被丢弃
        assert_eq!(dashboard.utm.medium.len(), 1);
        assert!(dashboard.utm.campaign.is_empty());
        assert!(dashboard.utm.content.is_empty());

        // 设备代码不区分大小写，未设置的设备归入 Outro
        let devices: Vec<(&str, u64)> = dashboard
            .devices
            .iter()
            .map(|d| (d.device.as_str(), d.clicks))
            .collect();
        assert_eq!(devices, vec![("Mobile", 2), ("Outro", 1), ("Desktop", 1)]);

        // 同一域名的不同 URL 合并，缺失来源记为 Direct
        let referrers: Vec<(&str, u64, f64)> = dashboard
            .referrers
            .iter()
            .map(|r| (r.domain.as_str(), r.clicks, r.percentage))
            .collect();
        assert_eq!(
            referrers,
            vec![
                ("google.com", 2, 50.0),
                ("Direct", 1, 25.0),
                ("facebook.com", 1, 25.0)
            ]
        );
    }

    #[tokio::test]
    async fn test_heatmap() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        assert_eq!(dashboard.heatmap.len(), 168);
        let total: u64 = dashboard.heatmap.iter().map(|c| c.value).sum();
        assert_eq!(total, 4);

        // 2024-06-10 是周一
        assert_eq!(june(10).weekday().num_days_from_sunday(), 1);
        let monday_10h = dashboard
            .heatmap
            .iter()
            .find(|c| c.day == 1 && c.hour == 10)
            .unwrap();
        assert_eq!(monday_10h.value, 1);

        let saturday_8h = dashboard
            .heatmap
            .iter()
            .find(|c| c.day == 6 && c.hour == 8)
            .unwrap();
        assert_eq!(saturday_8h.value, 1);
    }

    #[tokio::test]
    async fn test_link_comparison() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        let comparison = &dashboard.link_comparison;
        let legend: Vec<(&str, &str, u64)> = comparison
            .links
            .iter()
            .map(|l| (l.slug.as_str(), l.color.as_str(), l.total_clicks))
            .collect();
        assert_eq!(
            legend,
            vec![("promo", "#25D366", 3), ("blog", "#3B82F6", 1)]
        );

        assert_eq!(comparison.rows.len(), 7);
        for row in &comparison.rows {
            assert_eq!(row.values.len(), 2);
        }
        let june_10 = &comparison.rows[1];
        assert_eq!(june_10.date, june(10));
        assert_eq!(june_10.values["promo"], 2);
        assert_eq!(june_10.values["blog"], 0);
        assert_eq!(comparison.rows[6].values["blog"], 1);
    }

    #[tokio::test]
    async fn test_empty_sections() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        assert_eq!(
            dashboard.empty_sections(),
            vec![DashboardSection::UtmCampaign, DashboardSection::UtmContent]
        );
    }

    #[tokio::test]
    async fn test_single_link_filter() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", Some(2), seven_days(), fixed_now())
            .await
            .unwrap();

        assert_eq!(dashboard.link_id, Some(2));
        assert_eq!(dashboard.total_clicks, 1);
        assert_eq!(dashboard.total_leads, 0);
        assert_eq!(dashboard.conversion_rate, 0.0);
        // 对比图仍然是用户级别
        assert_eq!(dashboard.link_comparison.links.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_user_gets_empty_payload() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("nobody", None, seven_days(), fixed_now())
            .await
            .unwrap();

        assert_eq!(dashboard.total_clicks, 0);
        assert_eq!(dashboard.conversion_rate, 0.0);
        assert_eq!(dashboard.clicks_over_time.len(), 7);
        assert_eq!(dashboard.heatmap.len(), 168);
        assert!(dashboard.link_comparison.links.is_empty());
        assert_eq!(dashboard.link_comparison.rows.len(), 7);
        assert!(dashboard.link_comparison.rows.iter().all(|r| r.values.is_empty()));
        assert_eq!(dashboard.empty_sections().len(), 9);
    }

    #[tokio::test]
    async fn test_english_labels() {
        let settings = AnalyticsSettings {
            locale: LabelLocale::En,
            ..AnalyticsSettings::default()
        };
        let service = AnalyticsService::new(memory_repository(), settings);
        let dashboard = service
            .get_dashboard_at("u1", None, Period::days(30).unwrap(), fixed_now())
            .await
            .unwrap();

        assert_eq!(dashboard.clicks_over_time.len(), 30);
        assert_eq!(
            dashboard.clicks_over_time[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
        );
        assert_eq!(dashboard.clicks_over_time[0].label, "17 May");
        // 30 天内包含 06-01 与 06-05 的点击
        assert_eq!(dashboard.total_clicks, 7);
    }

    #[tokio::test]
    async fn test_dashboard_serializes_snake_case() {
        let service = service_with(memory_repository());
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["total_clicks"], 4);
        assert_eq!(json["conversion_rate"], 25.0);
        assert_eq!(json["trends"]["clicks"]["is_positive"], true);
        assert_eq!(json["heatmap"].as_array().unwrap().len(), 168);
        assert!(json["link_comparison"]["rows"][0]["values"].is_object());
    }
}

// =============================================================================
// 周期解析
// =============================================================================

#[cfg(test)]
mod period_tests {
    use super::*;

    #[test]
    fn test_parse_period_default() {
        let service = service_with(memory_repository());
        assert_eq!(service.parse_period(None).unwrap().get(), 30);
        assert_eq!(service.parse_period(Some("7d")).unwrap().get(), 7);
    }

    #[test]
    fn test_parse_period_rejects_bad_tokens() {
        let service = service_with(memory_repository());
        for token in ["0d", "-3d", "abc", "", "366d"] {
            assert!(
                matches!(
                    service.parse_period(Some(token)),
                    Err(LinkpulseError::InvalidPeriod(_))
                ),
                "token {:?} should be rejected",
                token
            );
        }
    }
}

// =============================================================================
// 错误传播
// =============================================================================

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_phase_one_failure_aborts() {
        for method in ["count_clicks", "count_leads", "breakdown_by", "heatmap"] {
            let service = service_with(Arc::new(FailingRepository { fail_on: method }));
            let err = service
                .get_dashboard_at("u1", None, seven_days(), fixed_now())
                .await
                .unwrap_err();
            match err {
                LinkpulseError::RepositoryFailure(msg) => {
                    assert!(msg.contains(method), "message {:?} should name {}", msg, method)
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_phase_two_failure_aborts() {
        let service = service_with(Arc::new(FailingRepository {
            fail_on: "clicks_per_day_for_links",
        }));
        let err = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap_err();
        assert!(matches!(err, LinkpulseError::RepositoryFailure(_)));
    }

    #[tokio::test]
    async fn test_healthy_failing_repository_succeeds() {
        let service = service_with(Arc::new(FailingRepository { fail_on: "ping" }));
        let dashboard = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap();
        assert_eq!(dashboard.total_clicks, 10);
        assert_eq!(dashboard.conversion_rate, 10.0);
        assert_eq!(dashboard.link_comparison.links.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_user_id_is_rejected() {
        let service = service_with(memory_repository());
        assert!(matches!(
            service
                .get_dashboard_at("  ", None, seven_days(), fixed_now())
                .await,
            Err(LinkpulseError::Validation(_))
        ));
        assert!(matches!(
            service.list_user_links("").await,
            Err(LinkpulseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let settings = AnalyticsSettings {
            query_timeout: Some(Duration::from_millis(50)),
            ..AnalyticsSettings::default()
        };
        let service = AnalyticsService::new(Arc::new(StalledRepository), settings);
        let err = service
            .get_dashboard_at("u1", None, seven_days(), fixed_now())
            .await
            .unwrap_err();
        match err {
            LinkpulseError::RepositoryFailure(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

// =============================================================================
// 查询编排
// =============================================================================

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn test_phase_one_queries_run_concurrently() {
        let repository = Arc::new(BarrierRepository::new());
        let service = service_with(repository.clone());

        // 第一阶段若逐个 await，Barrier 永远凑不齐
        let dashboard = tokio::time::timeout(
            Duration::from_secs(5),
            service.get_dashboard_at("u1", None, seven_days(), fixed_now()),
        )
        .await
        .expect("phase one queries were not in flight together")
        .unwrap();

        assert_eq!(dashboard.total_clicks, 10);
        assert_eq!(dashboard.total_leads, 1);
    }

    #[tokio::test]
    async fn test_link_series_waits_for_top_links() {
        let repository = Arc::new(BarrierRepository::new());
        let service = service_with(repository.clone());

        tokio::time::timeout(
            Duration::from_secs(5),
            service.get_dashboard_at("u1", None, seven_days(), fixed_now()),
        )
        .await
        .expect("dashboard aggregation stalled")
        .unwrap();

        assert_eq!(
            repository.events(),
            vec!["top_links_returned", "link_series_started"]
        );
    }
}

// =============================================================================
// 链接列表
// =============================================================================

#[cfg(test)]
mod user_links_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_user_links() {
        let service = service_with(memory_repository());
        let links = service.list_user_links("u1").await.unwrap();
        let slugs: Vec<(i64, &str, u64)> = links
            .iter()
            .map(|l| (l.id, l.slug.as_str(), l.click_count))
            .collect();
        assert_eq!(slugs, vec![(1, "promo", 120), (2, "blog", 7)]);
    }

    #[tokio::test]
    async fn test_list_user_links_failure() {
        let service = service_with(Arc::new(FailingRepository {
            fail_on: "user_links",
        }));
        assert!(matches!(
            service.list_user_links("u1").await,
            Err(LinkpulseError::RepositoryFailure(_))
        ));
    }
}
