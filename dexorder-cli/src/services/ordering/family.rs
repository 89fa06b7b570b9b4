//! Family ranking: chain order, baby first, then id

use std::collections::BTreeMap;

use super::dense::ensure_unique_ids;
use super::error::OrderError;
use super::models::{Family, Order, RecordKind};

/// Assign every family its 1-based position in `(chain_id, !is_baby, id)` order.
///
/// The id makes the key total, so the result has no ties and no gaps.
pub fn rank_families(families: &[Family]) -> Result<BTreeMap<i64, Order>, OrderError> {
    ensure_unique_ids(RecordKind::Family, families.iter().map(|f| f.id))?;

    let mut sorted: Vec<&Family> = families.iter().collect();
    sorted.sort_by_key(|f| (f.chain_id, !f.is_baby, f.id));

    let orders: BTreeMap<i64, Order> = sorted
        .iter()
        .enumerate()
        .map(|(position, family)| (family.id, position as Order + 1))
        .collect();

    log::debug!("Ranked {} families", orders.len());
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baby_sorts_first_within_chain() {
        let families = vec![
            Family::new(1, 10, false),
            Family::new(2, 10, true),
            Family::new(3, 20, false),
        ];

        let orders = rank_families(&families).unwrap();

        assert_eq!(orders[&2], 1);
        assert_eq!(orders[&1], 2);
        assert_eq!(orders[&3], 3);
    }

    #[test]
    fn test_chain_order_beats_id() {
        let families = vec![
            Family::new(1, 30, false),
            Family::new(50, 5, false),
            Family::new(51, 5, false),
        ];

        let orders = rank_families(&families).unwrap();

        assert!(orders[&50] < orders[&51]);
        assert!(orders[&51] < orders[&1]);
    }

    #[test]
    fn test_orders_are_contiguous() {
        let families: Vec<Family> = (1..=20)
            .map(|id| Family::new(id, (id % 4) * 100, id % 7 == 0))
            .collect();

        let orders = rank_families(&families).unwrap();
        let mut values: Vec<Order> = orders.values().copied().collect();
        values.sort();

        assert_eq!(values, (1..=20).collect::<Vec<Order>>());
    }

    #[test]
    fn test_rerun_is_identical() {
        let families = vec![
            Family::new(4, 2, false),
            Family::new(3, 2, true),
            Family::new(1, 1, false),
        ];
        let mut shuffled = families.clone();
        shuffled.reverse();

        assert_eq!(
            rank_families(&families).unwrap(),
            rank_families(&shuffled).unwrap()
        );
    }

    #[test]
    fn test_duplicate_family_id_is_rejected() {
        let families = vec![Family::new(1, 1, false), Family::new(1, 2, false)];
        assert!(matches!(
            rank_families(&families),
            Err(OrderError::DuplicateId {
                kind: RecordKind::Family,
                id: 1
            })
        ));
    }
}
