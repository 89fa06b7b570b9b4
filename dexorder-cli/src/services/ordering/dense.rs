//! Enumeration helpers shared by the rankers

use std::collections::HashSet;

use super::error::OrderError;
use super::models::{Order, RecordKind};

/// Dense rank of items that are already sorted by `key`.
///
/// Equal adjacent keys share a rank and each key change advances the rank by
/// exactly one, so the highest rank is the number of distinct keys.
pub fn dense_rank<T, K, F>(sorted: &[T], key: F) -> Vec<Order>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranks = Vec::with_capacity(sorted.len());
    let mut previous: Option<K> = None;
    let mut rank: Order = 0;

    for item in sorted {
        let current = key(item);
        if previous.as_ref() != Some(&current) {
            rank += 1;
            previous = Some(current);
        }
        ranks.push(rank);
    }

    ranks
}

/// Fail on the first id seen twice
pub fn ensure_unique_ids(
    kind: RecordKind,
    ids: impl IntoIterator<Item = i64>,
) -> Result<(), OrderError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(OrderError::DuplicateId { kind, id });
        }
    }
    Ok(())
}
