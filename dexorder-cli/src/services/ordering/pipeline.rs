//! Sequencing of the three ranking stages over one snapshot

use super::entity::{find_collisions, rank_entities};
use super::error::OrderError;
use super::family::rank_families;
use super::models::{Orders, Snapshot};
use super::variant::rank_variants;

/// Runs family, variant and entity ranking in that order.
///
/// Each stage only sees the orders of the stages before it. The pipeline
/// holds no state between runs, so the same snapshot always produces the
/// same `Orders`.
#[derive(Debug, Clone)]
pub struct OrderPipeline<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> OrderPipeline<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Rank everything, failing on the first collision
    pub fn run(&self) -> Result<Orders, OrderError> {
        let orders = self.rank()?;

        if let Some(collision) = find_collisions(&orders.entities).into_iter().next() {
            log::error!("{}", collision);
            return Err(collision);
        }

        log::info!(
            "Computed orders for {} families, {} variants, {} entities",
            orders.families.len(),
            orders.variants.len(),
            orders.entities.len()
        );
        Ok(orders)
    }

    /// Rank everything without checking entity orders for collisions
    pub fn rank(&self) -> Result<Orders, OrderError> {
        let families = rank_families(&self.snapshot.families)?;
        let variants = rank_variants(&self.snapshot.variants, &families)?;
        let entities = rank_entities(&self.snapshot.entities, &variants)?;

        Ok(Orders {
            families,
            variants,
            entities: entities.orders,
            unranked_entities: entities.unranked,
        })
    }
}
