//! Column mapping from localized labels to canonical field names
//!
//! Lookups are exact string matches. A miss means the deployment table is
//! out of date with the live department list; [`LookupTable::translate`]
//! reports it as [`PipelineError::UnmappedLabel`] and leaves it to the caller
//! whether that is fatal. [`LookupTable::lookup`] is the tolerant variant.

use std::collections::BTreeMap;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::{PipelineError, Result};
use crate::models::{Dataset, Value};

/// Deployment-specific mapping from localized label to canonical field
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    name: String,
    entries: FxHashMap<String, String>,
}

impl LookupTable {
    /// Create a table from configured `(label, canonical)` entries
    pub fn new(name: &str, entries: &BTreeMap<String, String>) -> Self {
        Self {
            name: name.to_string(),
            entries: entries
                .iter()
                .map(|(label, canonical)| (label.clone(), canonical.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical name for `label`, if the table knows it
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Canonical name for `label`, failing on a miss
    pub fn translate(&self, label: &str) -> Result<&str> {
        self.lookup(label)
            .ok_or_else(|| PipelineError::UnmappedLabel {
                label: label.to_string(),
                table: self.name().to_string(),
            })
    }

    /// Translate every label, failing on the first miss
    pub fn translate_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<String>> {
        labels
            .iter()
            .map(|label| self.translate(label.as_ref()).map(ToString::to_string))
            .collect()
    }

    /// Every canonical field this table can produce, sorted and deduplicated
    #[must_use]
    pub fn canonical_fields(&self) -> Vec<String> {
        self.entries.values().sorted().dedup().cloned().collect()
    }
}

/// Turn a `(label, count)` dataset into canonical columns and values
///
/// The rows are concatenated into one flat sequence; even positions are the
/// labels and odd positions the counts paired with them. Labels are
/// translated through `table`. Both outputs have one entry per input row, in
/// input order.
pub fn flatten_paired(dataset: &Dataset, table: &LookupTable) -> Result<(Vec<String>, Vec<Value>)> {
    if let Some((row, bad)) = dataset.iter().find_position(|row| row.len() != 2) {
        return Err(PipelineError::ShapeMismatch {
            row,
            expected: 2,
            actual: bad.len(),
        });
    }

    let (labels, values): (Vec<String>, Vec<Value>) = dataset
        .iter()
        .flatten()
        .tuples()
        .map(|(label, value)| (label.to_string(), value.clone()))
        .unzip();

    let columns = table.translate_all(&labels)?;
    Ok((columns, values))
}
