//! Row-stream aggregation algorithms
//!
//! This module implements the transformation stages from raw datasets to
//! canonical records: row primitives, label mapping, record assembly,
//! degraded-mode handling and the per-topic aggregators.

pub mod accumulator;
pub mod assembler;
pub mod dashboard;
pub mod degraded;
pub mod mapping;
pub mod rows;
pub mod topics;

// Re-export common types
pub use accumulator::{OccupancyAccumulator, UnitCounts};
pub use degraded::Fill;
pub use mapping::LookupTable;
