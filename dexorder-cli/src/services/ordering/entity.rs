//! Entity ranking: collapse variants down to each entity's default variant
//!
//! Ranking densely over the default variant's order closes the gaps that
//! non-default variants leave behind. Two entities landing on the same
//! variant order keep the same rank; `find_collisions` is what turns that
//! into an error.

use std::collections::BTreeMap;

use super::dense::dense_rank;
use super::error::OrderError;
use super::models::{Entity, Order, RecordKind};

/// Result of the entity stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRanking {
    pub orders: BTreeMap<i64, Order>,
    /// Entities with no default variant, left out of ranking
    pub unranked: Vec<i64>,
}

/// Dense rank entities by the order of their default variant.
///
/// Snapshot rows come from a join, so an entity appears once per default
/// variant; more than one such row is malformed input.
pub fn rank_entities(
    entities: &[Entity],
    variant_orders: &BTreeMap<i64, Order>,
) -> Result<EntityRanking, OrderError> {
    let mut links: BTreeMap<i64, Vec<Option<i64>>> = BTreeMap::new();
    for entity in entities {
        links
            .entry(entity.id)
            .or_default()
            .push(entity.default_variant_id);
    }

    let mut keyed = Vec::with_capacity(links.len());
    let mut unranked = Vec::new();

    for (entity_id, variant_ids) in &links {
        let variant_id = match variant_ids.as_slice() {
            [single] => *single,
            many if many.iter().all(Option::is_some) => {
                return Err(OrderError::MultipleDefaults {
                    entity_id: *entity_id,
                    variant_ids: many.iter().flatten().copied().collect(),
                });
            }
            _ => {
                return Err(OrderError::DuplicateId {
                    kind: RecordKind::Entity,
                    id: *entity_id,
                });
            }
        };

        let Some(variant_id) = variant_id else {
            unranked.push(*entity_id);
            continue;
        };

        let variant_order = variant_orders
            .get(&variant_id)
            .ok_or(OrderError::MissingVariant {
                entity_id: *entity_id,
                variant_id,
            })?;
        keyed.push((*variant_order, *entity_id));
    }

    keyed.sort();
    let ranks = dense_rank(&keyed, |(variant_order, _)| *variant_order);

    let orders: BTreeMap<i64, Order> = keyed
        .iter()
        .zip(ranks)
        .map(|((_, entity_id), rank)| (*entity_id, rank))
        .collect();

    if !unranked.is_empty() {
        log::warn!(
            "{} entities have no default variant and were not ranked",
            unranked.len()
        );
    }
    log::debug!("Ranked {} entities", orders.len());

    Ok(EntityRanking { orders, unranked })
}

/// Every order shared by more than one entity, lowest order first
pub fn find_collisions(orders: &BTreeMap<i64, Order>) -> Vec<OrderError> {
    let mut by_order: BTreeMap<Order, Vec<i64>> = BTreeMap::new();
    for (entity_id, order) in orders {
        by_order.entry(*order).or_default().push(*entity_id);
    }

    by_order
        .into_iter()
        .filter(|(_, entity_ids)| entity_ids.len() > 1)
        .map(|(order, entity_ids)| OrderError::AmbiguousOrder { order, entity_ids })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant_orders(pairs: &[(i64, Order)]) -> BTreeMap<i64, Order> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_gaps_from_non_default_variants_are_closed() {
        // variants 2 and 4 are non-default forms occupying orders 2 and 4
        let orders = variant_orders(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        let entities = vec![
            Entity::new(10, Some(1)),
            Entity::new(11, Some(3)),
            Entity::new(12, Some(5)),
        ];

        let ranking = rank_entities(&entities, &orders).unwrap();

        assert_eq!(ranking.orders[&10], 1);
        assert_eq!(ranking.orders[&11], 2);
        assert_eq!(ranking.orders[&12], 3);
        assert!(ranking.unranked.is_empty());
    }

    #[test]
    fn test_shared_variant_order_passes_tie_through() {
        // two default variants tied at order 4
        let orders = variant_orders(&[(1, 1), (2, 2), (3, 3), (40, 4), (41, 4)]);
        let entities = vec![
            Entity::new(1, Some(1)),
            Entity::new(2, Some(2)),
            Entity::new(3, Some(3)),
            Entity::new(7, Some(40)),
            Entity::new(9, Some(41)),
        ];

        let ranking = rank_entities(&entities, &orders).unwrap();

        assert_eq!(ranking.orders[&7], 4);
        assert_eq!(ranking.orders[&9], 4);
        assert_eq!(
            find_collisions(&ranking.orders),
            vec![OrderError::AmbiguousOrder {
                order: 4,
                entity_ids: vec![7, 9]
            }]
        );
    }

    #[test]
    fn test_entity_without_default_is_unranked() {
        let orders = variant_orders(&[(1, 1), (2, 2)]);
        let entities = vec![Entity::new(1, Some(2)), Entity::new(2, None)];

        let ranking = rank_entities(&entities, &orders).unwrap();

        assert_eq!(ranking.orders.len(), 1);
        assert_eq!(ranking.orders[&1], 1);
        assert_eq!(ranking.unranked, vec![2]);
    }

    #[test]
    fn test_missing_variant_fails_stage() {
        let orders = variant_orders(&[(1, 1)]);
        let entities = vec![Entity::new(1, Some(1)), Entity::new(2, Some(99))];

        assert_eq!(
            rank_entities(&entities, &orders).unwrap_err(),
            OrderError::MissingVariant {
                entity_id: 2,
                variant_id: 99
            }
        );
    }

    #[test]
    fn test_two_default_variants_is_malformed() {
        let orders = variant_orders(&[(1, 1), (2, 2)]);
        let entities = vec![Entity::new(1, Some(1)), Entity::new(1, Some(2))];

        assert_eq!(
            rank_entities(&entities, &orders).unwrap_err(),
            OrderError::MultipleDefaults {
                entity_id: 1,
                variant_ids: vec![1, 2]
            }
        );
    }

    #[test]
    fn test_no_collisions_on_strict_order() {
        let orders = variant_orders(&[(1, 1), (2, 2), (3, 3)]);
        assert!(find_collisions(&orders).is_empty());
    }
}
