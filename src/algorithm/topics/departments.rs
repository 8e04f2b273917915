//! Planned/actual occupancy per department profile

use crate::algorithm::assembler::build_one;
use crate::algorithm::degraded::{self, Fill, placeholder_record};
use crate::algorithm::mapping::flatten_paired;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{AggregateResult, Dataset};

/// Turn `(profile label, amount)` rows into one record keyed by profile
///
/// Labels are translated through the profiles lookup table; an unknown
/// label aborts the topic. A failed query yields a zero record over every
/// configured profile, so the output schema does not depend on failures.
pub fn aggregate(dataset: &Dataset, config: &PipelineConfig) -> Result<AggregateResult> {
    if degraded::is_failure(dataset, &config.failure_marker) {
        return Ok(placeholder(config, Fill::Zero));
    }
    let (columns, values) = flatten_paired(dataset, &config.profiles_table())?;
    Ok(AggregateResult::Summary(build_one(&columns, &values)?))
}

#[must_use]
pub fn placeholder(config: &PipelineConfig, fill: Fill) -> AggregateResult {
    let fields = config.profiles_table().canonical_fields();
    AggregateResult::Summary(placeholder_record(&fields, fill))
}
