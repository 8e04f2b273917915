//! Data model for the aggregation pipeline
//!
//! Raw datasets come in positionally typed, records and results go out keyed
//! by canonical field names.

pub mod dataset;
pub mod record;
pub mod result;
pub mod topic;
pub mod types;

// Re-export commonly used types
pub use dataset::{Dataset, RawRow};
pub use record::Record;
pub use result::{AggregateResult, FaultKind, FinalResult, TopicFault};
pub use topic::Topic;
pub use types::Value;
