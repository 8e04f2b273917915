//! Named records, the unit of aggregate output

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::types::Value;

/// Immutable mapping from canonical field name to value
///
/// Fields are kept in key order; the order in which they were assembled
/// carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create a record from `(field, value)` pairs
    ///
    /// A repeated field keeps its last value.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Integer content of a field, if present and an integer
    #[must_use]
    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any field holds NULL
    #[must_use]
    pub fn has_nulls(&self) -> bool {
        self.fields.values().any(Value::is_null)
    }
}
