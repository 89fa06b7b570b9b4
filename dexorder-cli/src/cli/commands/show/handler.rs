//! Show command handler

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

use super::{OutputFormat, ShowCommands, ShowKind};
use crate::config::Config;
use crate::db;
use crate::db::repository::orders::{self, EntityRow, FamilyRow, VariantRow};

/// Print one table in display order
pub async fn handle_show_command(args: ShowCommands, config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    db::migrate(&pool).await?;

    let output = match args.kind {
        ShowKind::Families => {
            let rows = orders::list_families(&pool, args.limit).await?;
            format_rows(&rows, args.format, family_table)?
        }
        ShowKind::Variants => {
            let rows = orders::list_variants(&pool, args.limit).await?;
            format_rows(&rows, args.format, variant_table)?
        }
        ShowKind::Entities => {
            let rows = orders::list_entities(&pool, args.limit).await?;
            format_rows(&rows, args.format, entity_table)?
        }
    };
    pool.close().await;

    print!("{}", output);
    Ok(())
}

/// Render rows in the requested format; `table` renders the human layout
fn format_rows<T: Serialize>(
    rows: &[T],
    format: OutputFormat,
    table: fn(&[T]) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table(rows)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(rows).context("Failed to format JSON output")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => to_csv(rows),
    }
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row).context("Failed to write CSV row")?;
    }
    let bytes = wtr.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn format_order(order: Option<i64>) -> ColoredString {
    match order {
        Some(order) => order.to_string().normal(),
        None => "-".dimmed(),
    }
}

fn family_table(rows: &[FamilyRow]) -> String {
    let mut out = format!("{:>6}  {:>6}  {:>6}  {}\n", "order", "id", "chain", "baby")
        .bold()
        .to_string();
    for row in rows {
        out.push_str(&format!(
            "{:>6}  {:>6}  {:>6}  {}\n",
            format_order(row.order),
            row.id,
            row.chain_id,
            if row.is_baby { "yes".cyan() } else { "".normal() }
        ));
    }
    out
}

fn variant_table(rows: &[VariantRow]) -> String {
    let mut out = format!(
        "{:>6}  {:>6}  {:>6}  {:>8}  {:<7}  {}\n",
        "order", "id", "entity", "priority", "default", "identifier"
    )
    .bold()
    .to_string();
    for row in rows {
        out.push_str(&format!(
            "{:>6}  {:>6}  {:>6}  {:>8}  {:<7}  {}\n",
            format_order(row.order),
            row.id,
            row.entity_id,
            row.priority,
            if row.is_default { "yes".cyan() } else { "no".dimmed() },
            row.identifier
        ));
    }
    out
}

fn entity_table(rows: &[EntityRow]) -> String {
    let mut out = format!("{:>6}  {:>6}  {:>6}\n", "order", "id", "family")
        .bold()
        .to_string();
    for row in rows {
        out.push_str(&format!(
            "{:>6}  {:>6}  {:>6}\n",
            format_order(row.order),
            row.id,
            row.family_id
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<EntityRow> {
        vec![
            EntityRow {
                id: 25,
                family_id: 25,
                order: Some(1),
            },
            EntityRow {
                id: 10033,
                family_id: 3,
                order: None,
            },
        ]
    }

    #[test]
    fn test_csv_output_has_header_and_empty_nulls() {
        let csv = format_rows(&sample_rows(), OutputFormat::Csv, entity_table).unwrap();
        assert_eq!(csv, "id,family_id,order\n25,25,1\n10033,3,\n");
    }

    #[test]
    fn test_json_output_keeps_nulls() {
        let json = format_rows(&sample_rows(), OutputFormat::Json, entity_table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["order"], 1);
        assert!(value[1]["order"].is_null());
    }

    #[test]
    fn test_table_lists_every_row() {
        colored::control::set_override(false);
        let table = format_rows(&sample_rows(), OutputFormat::Table, entity_table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].trim_start().starts_with('-'));
    }
}
