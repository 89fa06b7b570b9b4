//! Reads the ranking inputs out of the database

use anyhow::{Context, Result};
use sqlx::{Row, SqliteConnection};

use crate::services::ordering::{Entity, Family, Snapshot, Variant};

/// Read families, variants and entities in one pass on the given connection
///
/// Pass a transaction to get a consistent view of all three tables.
pub async fn load_snapshot(conn: &mut SqliteConnection) -> Result<Snapshot> {
    let families = load_families(conn).await?;
    let variants = load_variants(conn).await?;
    let entities = load_entities(conn).await?;

    log::debug!(
        "Loaded snapshot: {} families, {} variants, {} entity links",
        families.len(),
        variants.len(),
        entities.len()
    );

    Ok(Snapshot {
        families,
        variants,
        entities,
    })
}

async fn load_families(conn: &mut SqliteConnection) -> Result<Vec<Family>> {
    let rows = sqlx::query("SELECT id, chain_id, is_baby FROM families")
        .fetch_all(&mut *conn)
        .await
        .context("Failed to load families")?;

    let mut families = Vec::with_capacity(rows.len());
    for row in rows {
        families.push(Family::new(
            row.try_get("id")?,
            row.try_get("chain_id")?,
            row.try_get::<i64, _>("is_baby")? != 0,
        ));
    }

    Ok(families)
}

/// Variants with their family resolved through the owning entity
async fn load_variants(conn: &mut SqliteConnection) -> Result<Vec<Variant>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, e.family_id, v.priority
        FROM variants v
        LEFT JOIN entities e ON e.id = v.entity_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to load variants")?;

    let mut variants = Vec::with_capacity(rows.len());
    for row in rows {
        variants.push(Variant {
            id: row.try_get("id")?,
            family_id: row.try_get("family_id")?,
            priority: row.try_get("priority")?,
        });
    }

    Ok(variants)
}

/// One row per entity and default variant; entities without one get a NULL link
async fn load_entities(conn: &mut SqliteConnection) -> Result<Vec<Entity>> {
    let rows = sqlx::query(
        r#"
        SELECT e.id, v.id AS variant_id
        FROM entities e
        LEFT JOIN variants v ON v.entity_id = e.id AND v.is_default = 1
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to load entities")?;

    let mut entities = Vec::with_capacity(rows.len());
    for row in rows {
        entities.push(Entity::new(row.try_get("id")?, row.try_get("variant_id")?));
    }

    Ok(entities)
}
