//! Degraded-mode detection and placeholder shapes
//!
//! A failed query arrives as the single-row failure sentinel. It is checked
//! once per pulled dataset, before any row primitive sees it, and the topic
//! falls back to its declared shape filled with placeholders.

use crate::models::{Dataset, Record, Value};

/// Placeholder used to fill a degraded topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Per-category counts after a query failure
    Zero,
    /// Scalar counts when the source itself was unavailable
    Null,
}

impl Fill {
    #[must_use]
    pub const fn value(self) -> Value {
        match self {
            Self::Zero => Value::zero(),
            Self::Null => Value::Null,
        }
    }
}

/// Whether `dataset` is the failure sentinel for `marker`
#[must_use]
pub fn is_failure(dataset: &Dataset, marker: &str) -> bool {
    dataset.is_failure(marker)
}

/// `n` zero counts
#[must_use]
pub fn zero_counts(n: usize) -> Vec<usize> {
    vec![0; n]
}

/// A record over `columns` with every field set to the placeholder
pub fn placeholder_record<S: AsRef<str>>(columns: &[S], fill: Fill) -> Record {
    Record::from_pairs(columns.iter().map(|c| (c.as_ref(), fill.value())))
}
