//! Persistence of dashboard records
//!
//! The store accepts one main record per day and any number of accumulation
//! records. Rejections are returned as [`PersistenceError`] values; callers
//! log them and carry on with the rest of the batch.

pub mod cache;

use chrono::NaiveDate;
use rustc_hash::FxHashSet;

use crate::error::PersistenceError;
use crate::models::{Record, Value};

pub use cache::{CacheFill, CacheStore, Cacher, DMK_KEY, KIS_KEY, MemoryCache};

/// Result of a single insert
pub type InsertResult = std::result::Result<(), PersistenceError>;

/// Durable storage for dashboard records
pub trait PersistenceStore {
    /// Store the main record of a day
    ///
    /// # Errors
    /// [`PersistenceError::Duplicate`] when a record for the same date
    /// exists, [`PersistenceError::Validation`] for any schema mismatch.
    fn insert_main(&mut self, record: &Record) -> InsertResult;

    /// Store one per-profile accumulation record
    fn insert_accumulated(&mut self, record: &Record) -> InsertResult;

    /// Every stored main record, oldest first
    fn main_records(&self) -> Vec<Record>;

    /// Accumulation records stored for `date`
    fn accumulated_for(&self, date: NaiveDate) -> Vec<Record>;
}

fn record_date(record: &Record) -> Result<NaiveDate, PersistenceError> {
    record
        .get("dates")
        .and_then(Value::as_date)
        .ok_or_else(|| PersistenceError::Validation("'dates' must be a date".to_string()))
}

fn check_count(record: &Record, field: &str, nullable: bool) -> InsertResult {
    match record.get(field) {
        Some(Value::Int(n)) if *n >= 0 => Ok(()),
        Some(Value::Null) if nullable => Ok(()),
        Some(other) => Err(PersistenceError::Validation(format!(
            "'{field}' must be a non-negative integer, got {other}"
        ))),
        None => Err(PersistenceError::Validation(format!("'{field}' is missing"))),
    }
}

/// In-process store with the same constraints as the dashboard schema
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    main: Vec<Record>,
    main_dates: FxHashSet<NaiveDate>,
    accumulated: Vec<Record>,
    profiles: FxHashSet<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept accumulation records for these canonical profiles
    #[must_use]
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }
}

impl PersistenceStore for MemoryStore {
    fn insert_main(&mut self, record: &Record) -> InsertResult {
        let date = record_date(record)?;
        for field in ["arrived", "hosp", "refused", "signout", "deads", "reanimation"] {
            check_count(record, field, true)?;
        }
        if !self.main_dates.insert(date) {
            return Err(PersistenceError::Duplicate { date });
        }
        self.main.push(record.clone());
        Ok(())
    }

    fn insert_accumulated(&mut self, record: &Record) -> InsertResult {
        record_date(record)?;
        check_count(record, "number", false)?;
        let profile = record
            .get("profile")
            .and_then(Value::as_text)
            .ok_or_else(|| PersistenceError::Validation("'profile' must be text".to_string()))?;
        if !self.profiles.is_empty() && !self.profiles.contains(profile) {
            return Err(PersistenceError::Validation(format!(
                "unknown profile '{profile}'"
            )));
        }
        self.accumulated.push(record.clone());
        Ok(())
    }

    fn main_records(&self) -> Vec<Record> {
        let mut records = self.main.clone();
        records.sort_by_key(|r| r.get("dates").and_then(Value::as_date));
        records
    }

    fn accumulated_for(&self, date: NaiveDate) -> Vec<Record> {
        self.accumulated
            .iter()
            .filter(|r| r.get("dates").and_then(Value::as_date) == Some(date))
            .cloned()
            .collect()
    }
}
