//! Listing of deceased patients

use log::debug;

use crate::algorithm::accumulator::{OccupancyAccumulator, unit_counts};
use crate::algorithm::assembler::build;
use crate::algorithm::degraded;
use crate::algorithm::rows::count_by_keywords;
use crate::config::{ICU_UNIT_COUNT, PipelineConfig};
use crate::error::Result;
use crate::models::{AggregateResult, Dataset};

/// Pass every row through as a record and report deaths per ICU unit
///
/// The per-unit counts are appended to the deaths buffer of `acc` before the
/// rows are assembled. A failed query appends zero counts and yields an
/// empty listing.
pub fn aggregate(
    dataset: &Dataset,
    config: &PipelineConfig,
    acc: &mut OccupancyAccumulator,
) -> Result<AggregateResult> {
    if degraded::is_failure(dataset, &config.failure_marker) {
        acc.push_deaths([0; ICU_UNIT_COUNT]);
        return Ok(AggregateResult::Table(Vec::new()));
    }

    let counts = count_by_keywords(dataset, config.positions.death_unit, &config.keywords.icu_units);
    debug!("Deaths by ICU unit: {counts:?}");
    acc.push_deaths(unit_counts(&counts));

    Ok(AggregateResult::Table(build(
        &config.columns.deads,
        dataset.rows(),
    )?))
}
