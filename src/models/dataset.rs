//! Raw rows and datasets as returned by the database gateway

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::models::types::Value;

/// An ordered, fixed-arity tuple of values with no field names
pub type RawRow = SmallVec<[Value; 8]>;

/// Build a [`RawRow`] from heterogeneous literals
///
/// ```
/// use kis_pipeline::row;
/// let r = row![1, "Cardiology", "103"];
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {{
        let row: $crate::models::RawRow =
            [$($crate::models::Value::from($value)),*].into_iter().collect();
        row
    }};
}

/// Ordered sequence of raw rows produced by one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<RawRow>,
}

impl Dataset {
    #[must_use]
    pub const fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// A legitimately empty dataset (zero rows, no sentinel)
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// The single-row sentinel signalling that the query could not run
    #[must_use]
    pub fn failure(marker: &str) -> Self {
        let mut row = RawRow::new();
        row.push(Value::from(marker));
        Self { rows: vec![row] }
    }

    /// Whether this dataset is the failure sentinel for `marker`
    ///
    /// True iff the dataset is non-empty and its first row's first field
    /// equals the marker.
    #[must_use]
    pub fn is_failure(&self, marker: &str) -> bool {
        self.rows
            .first()
            .and_then(|row| row.first())
            .is_some_and(|value| *value == *marker)
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawRow> {
        self.rows.iter()
    }
}

impl FromIterator<RawRow> for Dataset {
    fn from_iter<I: IntoIterator<Item = RawRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a RawRow;
    type IntoIter = std::slice::Iter<'a, RawRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl From<Vec<RawRow>> for Dataset {
    fn from(rows: Vec<RawRow>) -> Self {
        Self::new(rows)
    }
}
