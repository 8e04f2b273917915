//! Day cache for the read side
//!
//! The first request of the day fills the cache; later requests read it
//! instead of hitting the database. Entries are only written when absent.

use chrono::NaiveDate;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde_json::{Value as JsonValue, json};

use crate::error::Result;
use crate::models::FinalResult;
use crate::store::PersistenceStore;

/// Cache key of the dashboard records
pub const DMK_KEY: &str = "dmk";

/// Cache key of the KIS report
pub const KIS_KEY: &str = "kis";

/// Key-value cache holding JSON documents
pub trait CacheStore {
    fn get(&self, key: &str) -> Option<&JsonValue>;

    fn set(&mut self, key: &str, value: JsonValue);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// In-process cache
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: FxHashMap<String, JsonValue>,
    writes: usize,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Drop every entry, as a daily expiry would
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: JsonValue) {
        self.writes += 1;
        self.entries.insert(key.to_string(), value);
    }
}

/// Which keys an [`Cacher::ensure_cached`] call wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheFill {
    pub dmk: bool,
    pub kis: bool,
}

/// Fills the day cache from the store and the KIS pipeline
pub struct Cacher<'a, C: CacheStore + ?Sized, S: PersistenceStore + ?Sized> {
    cache: &'a mut C,
    store: &'a S,
}

impl<'a, C: CacheStore + ?Sized, S: PersistenceStore + ?Sized> Cacher<'a, C, S> {
    pub fn new(cache: &'a mut C, store: &'a S) -> Self {
        Self { cache, store }
    }

    /// Write the `dmk` and `kis` entries that are missing
    ///
    /// `dmk` holds every stored main record plus today's accumulation
    /// records. `kis` holds the report produced by `report`, which is only
    /// called when that entry is missing.
    pub fn ensure_cached<F>(&mut self, today: NaiveDate, report: F) -> Result<CacheFill>
    where
        F: FnOnce() -> Result<FinalResult>,
    {
        let mut fill = CacheFill::default();

        if self.cache.contains(DMK_KEY) {
            debug!("Cache entry '{DMK_KEY}' present");
        } else {
            let dmk = json!({
                "main": self.store.main_records(),
                "accum_dmk": self.store.accumulated_for(today),
            });
            self.cache.set(DMK_KEY, dmk);
            info!("Cached dashboard records for {today}");
            fill.dmk = true;
        }

        if self.cache.contains(KIS_KEY) {
            debug!("Cache entry '{KIS_KEY}' present");
        } else {
            let kis = report()?.to_json()?;
            self.cache.set(KIS_KEY, kis);
            info!("Cached KIS report for {today}");
            fill.kis = true;
        }

        Ok(fill)
    }
}
