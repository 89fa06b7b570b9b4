//! Reads and writes of the derived "order" columns

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::BTreeMap;

use crate::services::ordering::{Orders, RecordKind};

/// Orders currently stored, NULL for rows that were never ranked.
///
/// Kept as the raw column value so corrupt values (negative, out of range)
/// always compare unequal to a computed order.
pub type StoredOrders = BTreeMap<i64, Option<i64>>;

fn table_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Family => "families",
        RecordKind::Variant => "variants",
        RecordKind::Entity => "entities",
    }
}

/// Overwrite the order column of all three tables.
///
/// Each column is cleared before it is assigned so that moving existing
/// values around never trips a uniqueness constraint halfway through. Rows
/// missing from `orders` end up NULL.
pub async fn write_orders(conn: &mut SqliteConnection, orders: &Orders) -> Result<()> {
    for kind in RecordKind::all() {
        let table = table_name(*kind);
        let assigned = orders.for_kind(*kind);

        sqlx::query(&format!(r#"UPDATE {} SET "order" = NULL"#, table))
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Failed to clear {} order", table))?;

        let update = format!(r#"UPDATE {} SET "order" = ? WHERE id = ?"#, table);
        for (id, order) in assigned {
            sqlx::query(&update)
                .bind(*order as i64)
                .bind(*id)
                .execute(&mut *conn)
                .await
                .with_context(|| format!("Failed to write order {} for {} {}", order, kind, id))?;
        }

        log::debug!("Wrote {} {} orders", assigned.len(), kind);
    }

    Ok(())
}

/// Stored order of every row of one table
pub async fn load_stored_orders(
    conn: &mut SqliteConnection,
    kind: RecordKind,
) -> Result<StoredOrders> {
    let table = table_name(kind);
    let rows = sqlx::query(&format!(r#"SELECT id, "order" FROM {}"#, table))
        .fetch_all(&mut *conn)
        .await
        .with_context(|| format!("Failed to load {} order", table))?;

    let mut stored = BTreeMap::new();
    for row in rows {
        stored.insert(row.try_get("id")?, row.try_get("order")?);
    }

    Ok(stored)
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyRow {
    pub id: i64,
    pub chain_id: i64,
    pub is_baby: bool,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantRow {
    pub id: i64,
    pub entity_id: i64,
    pub identifier: String,
    pub priority: i64,
    pub is_default: bool,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityRow {
    pub id: i64,
    pub family_id: i64,
    pub order: Option<i64>,
}

/// SQLite treats a negative LIMIT as no limit
fn limit_value(limit: Option<usize>) -> i64 {
    limit.map(|l| l as i64).unwrap_or(-1)
}

/// Families in display order, unranked rows last
pub async fn list_families(pool: &SqlitePool, limit: Option<usize>) -> Result<Vec<FamilyRow>> {
    let rows = sqlx::query(
        r#"
        SELECT id, chain_id, is_baby, "order"
        FROM families
        ORDER BY "order" IS NULL, "order", id
        LIMIT ?
        "#,
    )
    .bind(limit_value(limit))
    .fetch_all(pool)
    .await
    .context("Failed to list families")?;

    let mut families = Vec::with_capacity(rows.len());
    for row in rows {
        families.push(FamilyRow {
            id: row.try_get("id")?,
            chain_id: row.try_get("chain_id")?,
            is_baby: row.try_get::<i64, _>("is_baby")? != 0,
            order: row.try_get("order")?,
        });
    }

    Ok(families)
}

/// Variants in display order; tied orders fall back to the identifier
pub async fn list_variants(pool: &SqlitePool, limit: Option<usize>) -> Result<Vec<VariantRow>> {
    let rows = sqlx::query(
        r#"
        SELECT id, entity_id, identifier, priority, is_default, "order"
        FROM variants
        ORDER BY "order" IS NULL, "order", identifier
        LIMIT ?
        "#,
    )
    .bind(limit_value(limit))
    .fetch_all(pool)
    .await
    .context("Failed to list variants")?;

    let mut variants = Vec::with_capacity(rows.len());
    for row in rows {
        variants.push(VariantRow {
            id: row.try_get("id")?,
            entity_id: row.try_get("entity_id")?,
            identifier: row.try_get("identifier")?,
            priority: row.try_get("priority")?,
            is_default: row.try_get::<i64, _>("is_default")? != 0,
            order: row.try_get("order")?,
        });
    }

    Ok(variants)
}

/// Entities in display order, unranked rows last
pub async fn list_entities(pool: &SqlitePool, limit: Option<usize>) -> Result<Vec<EntityRow>> {
    let rows = sqlx::query(
        r#"
        SELECT id, family_id, "order"
        FROM entities
        ORDER BY "order" IS NULL, "order", id
        LIMIT ?
        "#,
    )
    .bind(limit_value(limit))
    .fetch_all(pool)
    .await
    .context("Failed to list entities")?;

    let mut entities = Vec::with_capacity(rows.len());
    for row in rows {
        entities.push(EntityRow {
            id: row.try_get("id")?,
            family_id: row.try_get("family_id")?,
            order: row.try_get("order")?,
        });
    }

    Ok(entities)
}
