//! Per-run occupancy accumulator
//!
//! The intensive care listings and the deaths listing each leave one
//! "patients by unit" tuple behind for the occupancy summary. The
//! accumulator is created by the orchestrator at the start of a run, passed
//! by reference to those aggregators and consumed by the summary, so nothing
//! carries over into the next run.

use smallvec::SmallVec;

use crate::config::ICU_UNIT_COUNT;
use crate::error::{PipelineError, Result};

/// Patient counts per intensive care unit, in configured unit order
pub type UnitCounts = [usize; ICU_UNIT_COUNT];

/// Number of living-patient listings feeding the summary
pub const LIVING_LISTINGS: usize = 3;

/// Buffers carried from the listing aggregators to the occupancy summary
#[derive(Debug, Default)]
pub struct OccupancyAccumulator {
    living: SmallVec<[UnitCounts; LIVING_LISTINGS]>,
    deaths: SmallVec<[UnitCounts; 1]>,
}

/// Accumulator contents validated for the occupancy summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    /// Arrived, moved and current counts, in that order
    pub living: [UnitCounts; LIVING_LISTINGS],
    pub deaths: UnitCounts,
}

impl OccupancyAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the counts of one living-patient listing
    pub fn push_living(&mut self, counts: UnitCounts) {
        self.living.push(counts);
    }

    /// Append the counts of the deaths listing
    pub fn push_deaths(&mut self, counts: UnitCounts) {
        self.deaths.push(counts);
    }

    #[must_use]
    pub fn living(&self) -> &[UnitCounts] {
        &self.living
    }

    #[must_use]
    pub fn deaths(&self) -> &[UnitCounts] {
        &self.deaths
    }

    /// Consume the buffers, checking that every listing has reported
    ///
    /// # Errors
    /// [`PipelineError::PreconditionViolated`] unless exactly three living
    /// entries and one deaths entry were appended.
    pub fn into_snapshot(self) -> Result<OccupancySnapshot> {
        if self.living.len() != LIVING_LISTINGS || self.deaths.len() != 1 {
            return Err(PipelineError::PreconditionViolated(format!(
                "occupancy summary needs {LIVING_LISTINGS} living and 1 deaths entries, found {} and {}",
                self.living.len(),
                self.deaths.len()
            )));
        }
        Ok(OccupancySnapshot {
            living: [self.living[0], self.living[1], self.living[2]],
            deaths: self.deaths[0],
        })
    }
}

/// Convert per-unit counts into a fixed-width tuple
///
/// Counts beyond the tracked unit count are ignored; missing ones are zero.
#[must_use]
pub fn unit_counts(counts: &[usize]) -> UnitCounts {
    let mut out = [0; ICU_UNIT_COUNT];
    for (slot, count) in out.iter_mut().zip(counts) {
        *slot = *count;
    }
    out
}
