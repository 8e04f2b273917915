//! Row primitives: positional equality filtering and counting
//!
//! All functions tolerate rows that are shorter than the requested index;
//! such rows simply never match.

use rustc_hash::FxHashMap;

use crate::models::{Dataset, RawRow, Value};

fn matches<K>(row: &RawRow, index: usize, value: &K) -> bool
where
    K: ?Sized,
    Value: PartialEq<K>,
{
    row.get(index).is_some_and(|cell| *cell == *value)
}

/// Keep rows whose value at `index` equals `value`, preserving order
pub fn filter<K>(dataset: &Dataset, index: usize, value: &K) -> Dataset
where
    K: ?Sized,
    Value: PartialEq<K>,
{
    dataset
        .iter()
        .filter(|row| matches(row, index, value))
        .cloned()
        .collect()
}

/// Complement of [`filter`]: rows whose value at `index` differs from `value`
pub fn reject<K>(dataset: &Dataset, index: usize, value: &K) -> Dataset
where
    K: ?Sized,
    Value: PartialEq<K>,
{
    dataset
        .iter()
        .filter(|row| !matches(row, index, value))
        .cloned()
        .collect()
}

/// Number of rows
#[must_use]
pub fn count(dataset: &Dataset) -> usize {
    dataset.len()
}

/// Count matches for each keyword independently
///
/// The result is aligned with `keywords` and contains zeros for keywords
/// without matches. Rows holding values outside the keyword list are not
/// counted anywhere.
pub fn count_by_keywords<K>(dataset: &Dataset, index: usize, keywords: &[K]) -> Vec<usize>
where
    Value: PartialEq<K>,
{
    keywords
        .iter()
        .map(|keyword| {
            dataset
                .iter()
                .filter(|row| matches(row, index, keyword))
                .count()
        })
        .collect()
}

/// Split a dataset into `[total, positive, negative]` counts
///
/// Positive rows carry `value` at `index`; negative rows are the rest.
pub fn count_split<K>(dataset: &Dataset, index: usize, value: &K) -> [usize; 3]
where
    K: ?Sized,
    Value: PartialEq<K>,
{
    let total = count(dataset);
    let positive = dataset
        .iter()
        .filter(|row| matches(row, index, value))
        .count();
    [total, positive, total - positive]
}

/// Group rows by the value at `index` and count each group
///
/// Produces one `(label, count)` row per distinct value, in order of first
/// appearance. Rows shorter than `index` are skipped.
pub fn count_grouped(dataset: &Dataset, index: usize) -> Dataset {
    let mut positions: FxHashMap<&Value, usize> = FxHashMap::default();
    let mut groups: Vec<(&Value, usize)> = Vec::new();

    for cell in dataset.iter().filter_map(|row| row.get(index)) {
        match positions.get(cell).copied() {
            Some(pos) => groups[pos].1 += 1,
            None => {
                positions.insert(cell, groups.len());
                groups.push((cell, 1));
            }
        }
    }

    groups
        .into_iter()
        .map(|(label, n)| {
            let mut row = RawRow::new();
            row.push(label.clone());
            row.push(Value::from(n));
            row
        })
        .collect()
}
