//! A Rust library for aggregating hospital information system result sets
//! into canonical report records, with graceful degradation when individual
//! queries or the whole data source fail.

pub mod algorithm;
pub mod backfill;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{PipelineConfig, QuerySet};
pub use error::{PersistenceError, PipelineError, Result};
pub use models::{AggregateResult, Dataset, FinalResult, RawRow, Record, Topic, Value};

// Orchestration
pub use pipeline::{DashboardData, DashboardPipeline, KisPipeline, PipelineState, SaveReport};

// External boundaries
pub use gateway::{DatabaseGateway, DatasetSource, ReplayGateway, TopicFixture};
pub use store::{CacheStore, Cacher, MemoryCache, MemoryStore, PersistenceStore};

pub use backfill::{BackfillOptions, BackfillReport, backfill, dates_period};
