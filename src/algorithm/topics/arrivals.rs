//! Arrivals by admission channel and patient type

use log::debug;

use crate::algorithm::assembler::build_one;
use crate::algorithm::degraded::{self, Fill, placeholder_record};
use crate::algorithm::rows::{count_by_keywords, filter};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{AggregateResult, Dataset, Value};

/// Count admitted arrivals per channel and per patient type
///
/// Input rows are `(admitted flag, department, channel, patient type)`. Only
/// rows carrying the admitted flag are counted. Channel counts come first,
/// patient type counts second, labelled by the `arrived` column set. A failed
/// query yields all-zero counts.
pub fn aggregate(dataset: &Dataset, config: &PipelineConfig) -> Result<AggregateResult> {
    let keywords = &config.keywords;
    let positions = &config.positions;

    let (channels, statuses) = if degraded::is_failure(dataset, &config.failure_marker) {
        (
            degraded::zero_counts(keywords.channels.len()),
            degraded::zero_counts(keywords.statuses.len()),
        )
    } else {
        let admitted = filter(dataset, positions.admitted_flag, &keywords.admitted_flag);
        debug!("{} of {} arrivals admitted", admitted.len(), dataset.len());
        (
            count_by_keywords(&admitted, positions.channel, &keywords.channels),
            count_by_keywords(&admitted, positions.patient_type, &keywords.statuses),
        )
    };

    let values: Vec<Value> = channels.into_iter().chain(statuses).map(Value::from).collect();
    Ok(AggregateResult::Summary(build_one(&config.columns.arrived, &values)?))
}

#[must_use]
pub fn placeholder(config: &PipelineConfig, fill: Fill) -> AggregateResult {
    AggregateResult::Summary(placeholder_record(&config.columns.arrived, fill))
}
