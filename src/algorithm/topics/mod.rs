//! Topic aggregators
//!
//! Each aggregator consumes exactly one dataset, pulled in pipeline order,
//! and returns one [`AggregateResult`](crate::models::AggregateResult). The
//! failure sentinel is detected before any row primitive runs and turns the
//! topic into its placeholder shape.

pub mod arrivals;
pub mod deaths;
pub mod departments;
pub mod discharges;
pub mod icu;
pub mod occupancy;

use crate::algorithm::degraded::Fill;
use crate::config::PipelineConfig;
use crate::models::{AggregateResult, Topic};

/// Declared output shape of a topic filled with placeholders
#[must_use]
pub fn placeholder(topic: Topic, config: &PipelineConfig, fill: Fill) -> AggregateResult {
    match topic {
        Topic::Arrivals => arrivals::placeholder(config, fill),
        Topic::DepartmentOccupancy => departments::placeholder(config, fill),
        Topic::Discharges => discharges::placeholder(config, fill),
        Topic::Deaths | Topic::IcuArrived | Topic::IcuMoved | Topic::IcuCurrent => {
            AggregateResult::Table(Vec::new())
        }
        Topic::IcuOccupancy => occupancy::placeholder(config, fill),
    }
}
