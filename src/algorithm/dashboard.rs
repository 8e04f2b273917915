//! Daily dashboard counts
//!
//! The dashboard stores one main record per day (arrivals, hospitalised,
//! refused, sign-outs, deaths, intensive care arrivals) and one accumulation
//! record per department profile. Every part degrades to NULL on its own when
//! its query failed.

use chrono::NaiveDate;
use log::{debug, warn};

use crate::algorithm::degraded;
use crate::algorithm::rows::{count, count_split};
use crate::config::PipelineConfig;
use crate::models::{Dataset, Record, Value};

/// Columns of the daily main record
pub const MAIN_COLUMNS: [&str; 7] = [
    "dates",
    "arrived",
    "hosp",
    "refused",
    "signout",
    "deads",
    "reanimation",
];

/// `[arrived, hosp, refused]` from the arrivals dataset
#[must_use]
pub fn arrival_counts(dataset: &Dataset, config: &PipelineConfig) -> [Value; 3] {
    if degraded::is_failure(dataset, &config.failure_marker) {
        return [Value::Null, Value::Null, Value::Null];
    }
    count_split(
        dataset,
        config.positions.admitted_flag,
        &config.keywords.admitted_flag,
    )
    .map(Value::from)
}

/// `[signout, deads]` from the discharges dataset
///
/// Everything that did not leave for another reason is counted as a death.
#[must_use]
pub fn signout_counts(dataset: &Dataset, config: &PipelineConfig) -> [Value; 2] {
    if degraded::is_failure(dataset, &config.failure_marker) {
        return [Value::Null, Value::Null];
    }
    let [total, _, negative] = count_split(
        dataset,
        config.positions.outcome,
        &config.keywords.other_reason,
    );
    [Value::from(total), Value::from(negative)]
}

/// Number of intensive care arrivals
#[must_use]
pub fn reanimation_count(dataset: &Dataset, config: &PipelineConfig) -> Value {
    if degraded::is_failure(dataset, &config.failure_marker) {
        return Value::Null;
    }
    Value::from(count(dataset))
}

/// Assemble the daily main record
#[must_use]
pub fn main_record(
    date: NaiveDate,
    arrivals: [Value; 3],
    signout: [Value; 2],
    reanimation: Value,
) -> Record {
    let values = std::iter::once(Value::Date(date))
        .chain(arrivals)
        .chain(signout)
        .chain(std::iter::once(reanimation));
    Record::from_pairs(MAIN_COLUMNS.into_iter().zip(values))
}

/// Main record with every count NULL, used when the source is unavailable
#[must_use]
pub fn unavailable_record(date: NaiveDate) -> Record {
    main_record(
        date,
        [Value::Null, Value::Null, Value::Null],
        [Value::Null, Value::Null],
        Value::Null,
    )
}

/// One accumulation record per known department profile
///
/// Input rows are `(profile label, number)`. Rows whose profile is not in the
/// profiles lookup table are skipped, since the dashboard only tracks
/// configured profiles.
#[must_use]
pub fn accumulated_records(dataset: &Dataset, date: NaiveDate, config: &PipelineConfig) -> Vec<Record> {
    if degraded::is_failure(dataset, &config.failure_marker) {
        warn!("Department hospitalisation query failed, nothing to accumulate for {date}");
        return Vec::new();
    }

    let profiles = config.profiles_table();
    dataset
        .iter()
        .filter_map(|row| {
            let label = row.first()?.as_text()?;
            let Some(profile) = profiles.lookup(label) else {
                debug!("Skipping untracked profile '{label}'");
                return None;
            };
            let number = row.get(1).cloned().unwrap_or(Value::Null);
            Some(Record::from_pairs([
                ("dates", Value::Date(date)),
                ("number", number),
                ("profile", Value::from(profile)),
            ]))
        })
        .collect()
}
