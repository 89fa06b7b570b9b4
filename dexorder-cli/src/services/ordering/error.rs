//! Errors raised while ranking a snapshot

use super::models::{Order, RecordKind};

/// Fatal ranking failure; no orders are produced for the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The same id appears twice in one record kind
    DuplicateId { kind: RecordKind, id: i64 },
    /// A variant whose owning family is not in the snapshot
    MissingFamily {
        variant_id: i64,
        family_id: Option<i64>,
    },
    /// An entity linking to a variant that is not in the snapshot
    MissingVariant { entity_id: i64, variant_id: i64 },
    /// An entity with more than one default variant
    MultipleDefaults {
        entity_id: i64,
        variant_ids: Vec<i64>,
    },
    /// Distinct entities ranked onto the same order
    AmbiguousOrder { order: Order, entity_ids: Vec<i64> },
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::DuplicateId { kind, id } => {
                write!(f, "Duplicate {} id {} in snapshot", kind, id)
            }
            OrderError::MissingFamily {
                variant_id,
                family_id: Some(family_id),
            } => write!(
                f,
                "Variant {} belongs to family {} which does not exist",
                variant_id, family_id
            ),
            OrderError::MissingFamily {
                variant_id,
                family_id: None,
            } => write!(f, "Variant {} has no owning family", variant_id),
            OrderError::MissingVariant {
                entity_id,
                variant_id,
            } => write!(
                f,
                "Entity {} links to variant {} which does not exist",
                entity_id, variant_id
            ),
            OrderError::MultipleDefaults {
                entity_id,
                variant_ids,
            } => write!(
                f,
                "Entity {} has more than one default variant: {}",
                entity_id,
                join_ids(variant_ids)
            ),
            OrderError::AmbiguousOrder { order, entity_ids } => write!(
                f,
                "Ambiguous order {} shared by entities {}",
                order,
                join_ids(entity_ids)
            ),
        }
    }
}

impl std::error::Error for OrderError {}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
