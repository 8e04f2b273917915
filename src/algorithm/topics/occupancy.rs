//! Intensive care occupancy summary

use crate::algorithm::accumulator::{OccupancyAccumulator, UnitCounts};
use crate::algorithm::assembler::build_one;
use crate::algorithm::degraded::{Fill, placeholder_record};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{AggregateResult, Record, Value};

/// Keys of the summary, in arrived / moved / current / deaths order
pub const OCCUPANCY_KEYS: [&str; 4] = ["arrived_nums", "moved_nums", "current_nums", "deads_nums"];

/// Build the occupancy summary from a completed accumulator
///
/// Must run after the three intensive care listings and the deaths listing;
/// consuming an incomplete accumulator is a precondition fault.
pub fn aggregate(acc: OccupancyAccumulator, config: &PipelineConfig) -> Result<AggregateResult> {
    let snapshot = acc.into_snapshot()?;
    let columns = &config.columns.oar_amounts;

    let counts: [UnitCounts; 4] = [
        snapshot.living[0],
        snapshot.living[1],
        snapshot.living[2],
        snapshot.deaths,
    ];
    let entries = OCCUPANCY_KEYS
        .iter()
        .zip(counts)
        .map(|(key, unit)| {
            let values: Vec<Value> = unit.into_iter().map(Value::from).collect();
            build_one(columns, &values).map(|record| ((*key).to_string(), record))
        })
        .collect::<Result<Vec<(String, Record)>>>()?;

    Ok(AggregateResult::Keyed(entries))
}

#[must_use]
pub fn placeholder(config: &PipelineConfig, fill: Fill) -> AggregateResult {
    AggregateResult::Keyed(
        OCCUPANCY_KEYS
            .iter()
            .map(|key| {
                (
                    (*key).to_string(),
                    placeholder_record(&config.columns.oar_amounts, fill),
                )
            })
            .collect(),
    )
}
