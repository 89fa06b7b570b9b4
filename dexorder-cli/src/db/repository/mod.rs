//! Repository layer for database operations

pub mod orders;
pub mod reorder;
pub mod snapshot;
