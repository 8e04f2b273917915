//! Intensive care snapshot listings (arrived, moved, current)
//!
//! The three listings differ only in their column set.

use log::debug;

use crate::algorithm::accumulator::{OccupancyAccumulator, unit_counts};
use crate::algorithm::assembler::build;
use crate::algorithm::degraded;
use crate::algorithm::rows::count_by_keywords;
use crate::config::{ICU_UNIT_COUNT, PipelineConfig};
use crate::error::Result;
use crate::models::{AggregateResult, Dataset, Topic};

/// Column set of an intensive care listing topic
#[must_use]
pub fn columns_for(topic: Topic, config: &PipelineConfig) -> Option<&[String]> {
    match topic {
        Topic::IcuArrived => Some(config.columns.oar_arrived.as_slice()),
        Topic::IcuMoved => Some(config.columns.oar_moved.as_slice()),
        Topic::IcuCurrent => Some(config.columns.oar_current.as_slice()),
        _ => None,
    }
}

/// Pass rows through under `columns` and report patients per ICU unit
///
/// The per-unit counts are appended to the living buffer of `acc`. A failed
/// query appends zero counts and yields an empty listing.
pub fn aggregate(
    dataset: &Dataset,
    columns: &[String],
    config: &PipelineConfig,
    acc: &mut OccupancyAccumulator,
) -> Result<AggregateResult> {
    if degraded::is_failure(dataset, &config.failure_marker) {
        acc.push_living([0; ICU_UNIT_COUNT]);
        return Ok(AggregateResult::Table(Vec::new()));
    }

    let counts = count_by_keywords(dataset, config.positions.icu_unit, &config.keywords.icu_units);
    debug!("ICU patients by unit: {counts:?}");
    acc.push_living(unit_counts(&counts));

    Ok(AggregateResult::Table(build(columns, dataset.rows())?))
}
