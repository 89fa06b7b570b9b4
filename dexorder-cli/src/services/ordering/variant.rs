//! Variant ranking: family order first, priority second, dense ranked
//!
//! Variants of one family that share a priority get the same order. That tie
//! is left for the storage layer's `("order", identifier)` constraint to break
//! by name, it is never resolved here.

use std::collections::BTreeMap;

use super::dense::{dense_rank, ensure_unique_ids};
use super::error::OrderError;
use super::models::{Order, RecordKind, Variant};

/// Rank variants by `(family order, priority)` given the family orders of
/// the same run. Any variant whose family is unknown fails the whole stage.
pub fn rank_variants(
    variants: &[Variant],
    family_orders: &BTreeMap<i64, Order>,
) -> Result<BTreeMap<i64, Order>, OrderError> {
    ensure_unique_ids(RecordKind::Variant, variants.iter().map(|v| v.id))?;

    let mut keyed = Vec::with_capacity(variants.len());
    for variant in variants {
        let family_order = variant
            .family_id
            .and_then(|family_id| family_orders.get(&family_id))
            .ok_or(OrderError::MissingFamily {
                variant_id: variant.id,
                family_id: variant.family_id,
            })?;
        keyed.push((*family_order, variant.priority, variant.id));
    }

    // id only fixes iteration order inside a tie, it is not part of the rank key
    keyed.sort();
    let ranks = dense_rank(&keyed, |(family_order, priority, _)| (*family_order, *priority));

    let orders: BTreeMap<i64, Order> = keyed
        .iter()
        .zip(ranks)
        .map(|((_, _, id), rank)| (*id, rank))
        .collect();

    log::debug!(
        "Ranked {} variants into {} distinct orders",
        orders.len(),
        orders.values().max().copied().unwrap_or(0)
    );
    Ok(orders)
}
