//! Check command handler

use anyhow::Result;
use colored::*;

use super::CheckCommands;
use crate::config::Config;
use crate::db;

/// Fail when stored orders differ from a fresh computation
pub async fn handle_check_command(args: CheckCommands, config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::migrate(&pool).await?;
    let result = db::repository::reorder::check(&pool).await;
    pool.close().await;
    let report = result?;

    println!(
        "Checked {} families, {} variants, {} entities",
        report.orders.families.len(),
        report.orders.variants.len(),
        report.orders.entities.len() + report.orders.unranked_entities.len()
    );

    if report.is_clean() {
        println!("{}", "All orders are up to date".bright_green().bold());
        return Ok(());
    }

    for collision in &report.collisions {
        println!("{} {}", "collision:".red().bold(), collision);
    }

    if !report.drift.is_empty() {
        println!(
            "{} rows have a stale order:",
            report.drift.len().to_string().yellow().bold()
        );
        for drift in report.drift.iter().take(args.max_rows) {
            println!(
                "  {:<8} {:>6}  stored {:>6}  expected {:>6}",
                drift.kind.label(),
                drift.id,
                format_order(drift.stored).red(),
                format_order(drift.expected.map(i64::from)).green()
            );
        }
        if report.drift.len() > args.max_rows {
            println!("  ... and {} more", report.drift.len() - args.max_rows);
        }
    }

    anyhow::bail!(
        "Check failed: {} stale rows, {} collisions. Run 'dexorder reorder' after fixing the data.",
        report.drift.len(),
        report.collisions.len()
    )
}

fn format_order(order: Option<i64>) -> String {
    order.map(|o| o.to_string()).unwrap_or_else(|| "null".to_string())
}
