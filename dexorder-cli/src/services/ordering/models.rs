//! Snapshot records consumed by the rankers and the orders they produce

use std::collections::BTreeMap;

/// 1-based display position
pub type Order = u32;

/// A family (species) row: the top level of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Family {
    pub id: i64,
    /// Evolution chain; ascending chain id is already the desired chain order
    pub chain_id: i64,
    pub is_baby: bool,
}

impl Family {
    pub fn new(id: i64, chain_id: i64, is_baby: bool) -> Self {
        Self { id, chain_id, is_baby }
    }
}

/// A variant (form) row with its owning family resolved through its entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: i64,
    /// None when the owning entity could not be found
    pub family_id: Option<i64>,
    /// Duplicates within one family are intentional and left tied
    pub priority: i64,
}

impl Variant {
    #[cfg(test)]
    pub fn new(id: i64, family_id: i64, priority: i64) -> Self {
        Self {
            id,
            family_id: Some(family_id),
            priority,
        }
    }
}

/// An entity (pokemon) row and the link to its default variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub id: i64,
    /// Entities without a default variant are not ranked
    pub default_variant_id: Option<i64>,
}

impl Entity {
    pub fn new(id: i64, default_variant_id: Option<i64>) -> Self {
        Self {
            id,
            default_variant_id,
        }
    }
}

/// Full read of the three record kinds taken at the start of a run
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub families: Vec<Family>,
    pub variants: Vec<Variant>,
    pub entities: Vec<Entity>,
}

/// Which table a ranked id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Family,
    Variant,
    Entity,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Family => "family",
            RecordKind::Variant => "variant",
            RecordKind::Entity => "entity",
        }
    }

    pub fn all() -> &'static [RecordKind] {
        &[RecordKind::Family, RecordKind::Variant, RecordKind::Entity]
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one pipeline run, keyed by record id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Orders {
    pub families: BTreeMap<i64, Order>,
    pub variants: BTreeMap<i64, Order>,
    /// Only ranked entities appear here
    pub entities: BTreeMap<i64, Order>,
    /// Entities skipped for lacking a default variant
    pub unranked_entities: Vec<i64>,
}

impl Orders {
    pub fn for_kind(&self, kind: RecordKind) -> &BTreeMap<i64, Order> {
        match kind {
            RecordKind::Family => &self.families,
            RecordKind::Variant => &self.variants,
            RecordKind::Entity => &self.entities,
        }
    }
}
