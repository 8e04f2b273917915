//! Discharge outcomes with a per-department breakdown

use log::debug;

use crate::algorithm::assembler::build_one;
use crate::algorithm::degraded::{self, Fill, placeholder_record};
use crate::algorithm::mapping::flatten_paired;
use crate::algorithm::rows::{count_by_keywords, count_grouped, filter};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{AggregateResult, Dataset, Value};

/// Summarise `(department, outcome)` rows
///
/// The record holds the outcome totals (`signout` column set, one per
/// outcome keyword) followed by one field per department that discharged
/// patients, named through the departments lookup table. The number of
/// department fields depends on the deployment table and on the day's data.
///
/// A failed query yields zero totals and no department fields.
pub fn aggregate(dataset: &Dataset, config: &PipelineConfig) -> Result<AggregateResult> {
    if degraded::is_failure(dataset, &config.failure_marker) {
        return Ok(placeholder(config, Fill::Zero));
    }

    let positions = &config.positions;
    let keywords = &config.keywords;

    let discharged = filter(dataset, positions.outcome, &keywords.discharged);
    let per_department = count_grouped(&discharged, positions.signout_department);
    let (department_columns, department_values) =
        flatten_paired(&per_department, &config.departments_table())?;
    debug!(
        "{} discharged patients across {} departments",
        discharged.len(),
        department_columns.len()
    );

    let totals = count_by_keywords(dataset, positions.outcome, &keywords.outcomes);

    let columns: Vec<&str> = config
        .columns
        .signout
        .iter()
        .map(String::as_str)
        .chain(department_columns.iter().map(String::as_str))
        .collect();
    let values: Vec<Value> = totals
        .into_iter()
        .map(Value::from)
        .chain(department_values)
        .collect();

    Ok(AggregateResult::Summary(build_one(&columns, &values)?))
}

#[must_use]
pub fn placeholder(config: &PipelineConfig, fill: Fill) -> AggregateResult {
    AggregateResult::Summary(placeholder_record(&config.columns.signout, fill))
}
