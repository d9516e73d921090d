//! List links command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::AnalyticsService;

pub async fn list_links(service: &AnalyticsService, user: String) -> Result<(), CliError> {
    let links = service.list_user_links(&user).await?;

    if links.is_empty() {
        println!("{} No links found for user {}", "ℹ".bold().blue(), user.cyan());
        return Ok(());
    }

    println!("{}", format!("Links of {}:", user).bold().green());
    println!();
    for link in &links {
        println!(
            "  {} {} {}",
            format!("#{}", link.id).dimmed(),
            link.slug.cyan(),
            format!("(clicks: {})", link.click_count).dimmed().cyan()
        );
    }
    println!();
    println!(
        "{} Total {} links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
    Ok(())
}
