//! Reorder command handler

use anyhow::Result;
use colored::*;
use std::time::Instant;

use super::ReorderCommands;
use crate::config::Config;
use crate::db;
use crate::services::ordering::{Orders, RecordKind};

/// Run the ranking pipeline and write the result in one transaction
pub async fn handle_reorder_command(args: ReorderCommands, config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::migrate(&pool).await?;

    let start = Instant::now();
    let result = db::repository::reorder::reorder(&pool, args.dry_run).await;
    pool.close().await;
    let orders = result?;

    print_summary(&orders, args.dry_run);
    println!("Completed in {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}

fn print_summary(orders: &Orders, dry_run: bool) {
    if dry_run {
        println!("{}", "Dry run, nothing written".yellow().bold());
    } else {
        println!("{}", "Orders updated".bright_green().bold());
    }

    for kind in RecordKind::all() {
        let ranked = orders.for_kind(*kind);
        let highest = ranked.values().max().copied().unwrap_or(0);
        println!(
            "  {:<10} {:>6} rows, orders 1..{}",
            kind.label(),
            ranked.len().to_string().cyan(),
            highest
        );
    }

    if !orders.unranked_entities.is_empty() {
        println!(
            "  {} entities without a default variant left unranked",
            orders.unranked_entities.len().to_string().yellow()
        );
    }
}
