//! Transactional pipeline runs against the database

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::orders::{load_stored_orders, write_orders};
use super::snapshot::load_snapshot;
use crate::services::ordering::{
    Drift, OrderError, OrderPipeline, Orders, RecordKind, find_collisions, find_drift,
};

/// Recompute every order column inside one transaction.
///
/// A ranking error, a collision or a failed write rolls back the whole run,
/// so the tables are never left with only some stages applied. The write
/// lock is taken before the snapshot is read. With `dry_run` the computed
/// orders are returned and the transaction is rolled back.
pub async fn reorder(pool: &SqlitePool, dry_run: bool) -> Result<Orders> {
    let mut tx = pool
        .begin_with("BEGIN IMMEDIATE")
        .await
        .context("Failed to start transaction")?;

    let snapshot = load_snapshot(&mut tx).await?;
    let orders = OrderPipeline::new(&snapshot).run()?;

    if dry_run {
        tx.rollback().await.context("Failed to roll back transaction")?;
        log::info!("Dry run, no orders written");
        return Ok(orders);
    }

    write_orders(&mut tx, &orders).await?;
    tx.commit().await.context("Failed to commit transaction")?;

    log::info!("Orders written");
    Ok(orders)
}

/// Result of comparing stored orders with a fresh computation
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub orders: Orders,
    pub drift: Vec<Drift>,
    pub collisions: Vec<OrderError>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.drift.is_empty() && self.collisions.is_empty()
    }
}

/// Recompute orders without writing and report every difference.
///
/// Inputs and stored orders are read in one transaction so a concurrent
/// `reorder` cannot show up as drift. Malformed input still fails;
/// collisions are collected instead so the report can list all of them.
pub async fn check(pool: &SqlitePool) -> Result<CheckReport> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;
    let snapshot = load_snapshot(&mut tx).await?;

    let orders = OrderPipeline::new(&snapshot).rank()?;
    let collisions = find_collisions(&orders.entities);

    let mut drift = Vec::new();
    for kind in RecordKind::all() {
        let stored = load_stored_orders(&mut tx, *kind).await?;
        drift.extend(find_drift(*kind, &stored, orders.for_kind(*kind)));
    }

    tx.rollback().await.context("Failed to roll back transaction")?;

    if !drift.is_empty() {
        log::warn!("{} rows have a stale order", drift.len());
    }

    Ok(CheckReport {
        orders,
        drift,
        collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::orders::StoredOrders;
    use crate::db::{seed, test_pool};

    async fn stored_orders(pool: &SqlitePool, kind: RecordKind) -> StoredOrders {
        let mut conn = pool.acquire().await.unwrap();
        load_stored_orders(&mut conn, kind).await.unwrap()
    }

    /// Chain 1: family 2 (baby) and family 1; chain 2: family 3.
    /// Entity 10 has two forms, the second one non-default.
    async fn seeded_pool() -> SqlitePool {
        let pool = test_pool().await;
        seed(
            &pool,
            &[(1, 1, false), (2, 1, true), (3, 2, false)],
            &[(10, 1), (20, 2), (30, 3)],
            &[
                (100, 10, "plain", 0, true),
                (101, 10, "sunny", 1, false),
                (200, 20, "baby", 0, true),
                (300, 30, "third", 0, true),
            ],
        )
        .await;
        pool
    }

    #[tokio::test]
    async fn test_reorder_writes_all_stages() {
        let pool = seeded_pool().await;

        reorder(&pool, false).await.unwrap();

        let families = stored_orders(&pool, RecordKind::Family).await;
        assert_eq!(families[&2], Some(1));
        assert_eq!(families[&1], Some(2));
        assert_eq!(families[&3], Some(3));

        let variants = stored_orders(&pool, RecordKind::Variant).await;
        assert_eq!(variants[&200], Some(1));
        assert_eq!(variants[&100], Some(2));
        assert_eq!(variants[&101], Some(3));
        assert_eq!(variants[&300], Some(4));

        let entities = stored_orders(&pool, RecordKind::Entity).await;
        assert_eq!(entities[&20], Some(1));
        assert_eq!(entities[&10], Some(2));
        assert_eq!(entities[&30], Some(3));
    }

    #[tokio::test]
    async fn test_reorder_twice_is_stable() {
        let pool = seeded_pool().await;

        let first = reorder(&pool, false).await.unwrap();
        let second = reorder(&pool, false).await.unwrap();

        assert_eq!(first, second);
        assert!(check(&pool).await.unwrap().is_clean());
    }

    #[tokio::test]
    async fn test_new_data_shifts_orders_on_rerun() {
        let pool = seeded_pool().await;
        reorder(&pool, false).await.unwrap();

        // a new baby joins chain 2 and must now lead it
        seed(&pool, &[(4, 2, true)], &[(40, 4)], &[(400, 40, "newborn", 0, true)]).await;
        assert!(!check(&pool).await.unwrap().is_clean());

        reorder(&pool, false).await.unwrap();

        let families = stored_orders(&pool, RecordKind::Family).await;
        assert_eq!(families[&4], Some(3));
        assert_eq!(families[&3], Some(4));
        assert!(check(&pool).await.unwrap().is_clean());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let pool = seeded_pool().await;

        let orders = reorder(&pool, true).await.unwrap();
        assert_eq!(orders.families.len(), 3);

        let families = stored_orders(&pool, RecordKind::Family).await;
        assert!(families.values().all(Option::is_none));
    }

    #[tokio::test]
    async fn test_collision_rolls_back_everything() {
        let pool = seeded_pool().await;
        reorder(&pool, false).await.unwrap();

        // form 101 becomes the default of a new entity with the same priority
        // as form 100, so entities 10 and 11 land on one order
        seed(&pool, &[], &[(11, 1)], &[]).await;
        sqlx::query(
            "UPDATE variants SET entity_id = 11, is_default = 1, priority = 0 WHERE id = 101",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("UPDATE families SET chain_id = 5 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let err = reorder(&pool, false).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<OrderError>(),
            Some(&OrderError::AmbiguousOrder {
                order: 3,
                entity_ids: vec![10, 11]
            })
        );

        // family 1 moved chains, but nothing was written
        let families = stored_orders(&pool, RecordKind::Family).await;
        assert_eq!(families[&1], Some(2));

        let report = check(&pool).await.unwrap();
        assert_eq!(report.collisions.len(), 1);
        assert!(!report.drift.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_stored_order_is_reported() {
        let pool = seeded_pool().await;
        reorder(&pool, false).await.unwrap();

        // wraps to 1 when narrowed to 32 bits
        sqlx::query(r#"UPDATE families SET "order" = 4294967297 WHERE id = 2"#)
            .execute(&pool)
            .await
            .unwrap();

        let report = check(&pool).await.unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.drift.len(), 1);
        assert_eq!(report.drift[0].id, 2);
        assert_eq!(report.drift[0].stored, Some(4294967297));
        assert_eq!(report.drift[0].expected, Some(1));
    }

    #[tokio::test]
    async fn test_equal_priority_forms_are_stored_tied() {
        let pool = test_pool().await;
        seed(
            &pool,
            &[(1, 1, false)],
            &[(10, 1)],
            &[
                (100, 10, "a", 0, true),
                (101, 10, "b", 5, false),
                (102, 10, "c", 5, false),
            ],
        )
        .await;

        reorder(&pool, false).await.unwrap();

        let variants = stored_orders(&pool, RecordKind::Variant).await;
        assert_eq!(variants[&100], Some(1));
        assert_eq!(variants[&101], Some(2));
        assert_eq!(variants[&102], Some(2));
        assert!(check(&pool).await.unwrap().is_clean());

        // same priority and same identifier cannot be told apart by name
        seed(&pool, &[], &[], &[(103, 10, "b", 5, false)]).await;
        assert!(reorder(&pool, false).await.is_err());

        let variants = stored_orders(&pool, RecordKind::Variant).await;
        assert_eq!(variants[&101], Some(2));
        assert_eq!(variants[&102], Some(2));
        assert_eq!(variants[&103], None);
    }
}
