//! Record assembly: zip a column set against row values

use itertools::Itertools;

use crate::error::{PipelineError, Result};
use crate::models::{RawRow, Record, Value};

/// Build one record from a column set and a value tuple
///
/// # Errors
/// Returns [`PipelineError::ShapeMismatch`] when the lengths differ and
/// [`PipelineError::DuplicateColumn`] when a column is named twice.
pub fn build_one<S: AsRef<str>>(columns: &[S], values: &[Value]) -> Result<Record> {
    check_unique(columns)?;
    zip_row(0, columns, values)
}

/// Build one record per row
///
/// Every row must have exactly `columns.len()` values; nothing is truncated
/// or padded.
pub fn build<S: AsRef<str>>(columns: &[S], rows: &[RawRow]) -> Result<Vec<Record>> {
    check_unique(columns)?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| zip_row(index, columns, row))
        .collect()
}

/// Fail on the first column name that appears more than once
pub fn check_unique<S: AsRef<str>>(columns: &[S]) -> Result<()> {
    match columns.iter().map(AsRef::as_ref).duplicates().next() {
        Some(column) => Err(PipelineError::DuplicateColumn {
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

fn zip_row<S: AsRef<str>>(index: usize, columns: &[S], values: &[Value]) -> Result<Record> {
    if columns.len() != values.len() {
        return Err(PipelineError::ShapeMismatch {
            row: index,
            expected: columns.len(),
            actual: values.len(),
        });
    }
    Ok(Record::from_pairs(
        columns
            .iter()
            .map(|c| c.as_ref())
            .zip(values.iter().cloned()),
    ))
}
