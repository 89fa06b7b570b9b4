//! Comparison of computed orders against what storage currently holds

use std::collections::BTreeMap;

use super::models::{Order, RecordKind};

/// A row whose stored order differs from the freshly computed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub kind: RecordKind,
    pub id: i64,
    /// Raw column value, may be outside the range of `Order`
    pub stored: Option<i64>,
    pub expected: Option<Order>,
}

/// Rows of one kind whose stored order is not the expected one.
///
/// Rows absent from `expected` should be stored as NULL.
pub fn find_drift(
    kind: RecordKind,
    stored: &BTreeMap<i64, Option<i64>>,
    expected: &BTreeMap<i64, Order>,
) -> Vec<Drift> {
    stored
        .iter()
        .filter_map(|(id, stored_order)| {
            let expected_order = expected.get(id).copied();
            (*stored_order != expected_order.map(i64::from)).then_some(Drift {
                kind,
                id: *id,
                stored: *stored_order,
                expected: expected_order,
            })
        })
        .collect()
}
