// Ordering service for computing display order of families, variants and entities
//
// Pure ranking over an in-memory snapshot. Reading the snapshot and writing
// the resulting orders back is the repository layer's job.

pub mod dense;
pub mod drift;
pub mod entity;
pub mod error;
pub mod family;
pub mod models;
pub mod pipeline;
pub mod variant;

// Re-export commonly used types
pub use drift::{Drift, find_drift};
pub use entity::find_collisions;
pub use error::OrderError;
pub use models::{Entity, Family, Order, Orders, RecordKind, Snapshot, Variant};
pub use pipeline::OrderPipeline;
