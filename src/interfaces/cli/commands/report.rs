//! Report command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::AnalyticsService;

/// 运行一次 dashboard 聚合，把 JSON 写到 stdout
///
/// 摘要信息写到 stderr，方便把 stdout 直接交给 `jq`。
pub async fn run_report(
    service: &AnalyticsService,
    user: String,
    period: Option<String>,
    link: Option<i64>,
    pretty: bool,
) -> Result<(), CliError> {
    let period = service.parse_period(period.as_deref())?;
    let dashboard = service.get_dashboard(&user, link, period).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&dashboard)
    } else {
        serde_json::to_string(&dashboard)
    }
    .map_err(|e| CliError::CommandError(format!("Failed to serialize report: {}", e)))?;

    println!("{}", json);

    let empty: Vec<String> = dashboard
        .empty_sections()
        .into_iter()
        .map(|section| section.as_ref().to_string())
        .collect();
    eprintln!(
        "{} {} .. {}: {} clicks, {} leads, {}% conversion",
        "ℹ".bold().blue(),
        dashboard.period.current.first_day(),
        dashboard.period.current.last_day(),
        dashboard.total_clicks.to_string().green(),
        dashboard.total_leads.to_string().green(),
        dashboard.conversion_rate
    );
    if !empty.is_empty() {
        eprintln!("  {} {}", "No data:".dimmed(), empty.join(", ").yellow());
    }

    Ok(())
}
