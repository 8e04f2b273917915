//! Pipeline orchestration
//!
//! [`KisPipeline`] pulls one dataset per topic from the data source, in the
//! order the queries were submitted, and dispatches each to its aggregator.
//! The N-th dataset is assumed to answer the N-th query; nothing in the data
//! identifies its topic.
//!
//! A failed query degrades only its own topic. A source that cannot be
//! reached at all short-circuits the run to the all-null result without
//! pulling anything.

pub mod dashboard;

use std::fmt;
use std::time::Instant;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::algorithm::OccupancyAccumulator;
use crate::algorithm::degraded::Fill;
use crate::algorithm::topics::{self, arrivals, deaths, departments, discharges, icu, occupancy};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::gateway::{DatabaseGateway, DatasetSource};
use crate::models::{AggregateResult, Dataset, FaultKind, FinalResult, Topic};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_topic_fault};

pub use dashboard::{DashboardData, DashboardPipeline, SaveReport};

/// Lifecycle of one pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    /// Every topic was dispatched
    Done,
    /// The source was unavailable and every topic holds its null placeholder
    DegradedDone,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
            Self::DegradedDone => "degraded-done",
        };
        f.write_str(name)
    }
}

/// Orchestrator for one KIS report run
///
/// An instance runs once. Cross-topic counts live in an
/// [`OccupancyAccumulator`] created inside the run, so separate instances
/// never share state.
#[derive(Debug)]
pub struct KisPipeline<'c> {
    config: &'c PipelineConfig,
    state: PipelineState,
}

impl<'c> KisPipeline<'c> {
    #[must_use]
    pub const fn new(config: &'c PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Connect, submit the report queries for `date` and aggregate the answers
    ///
    /// The gateway is closed exactly once before this returns, whatever the
    /// outcome of the aggregation.
    ///
    /// # Errors
    /// [`PipelineError::PreconditionViolated`] if the pipeline already ran and
    /// [`PipelineError::SourceExhausted`] if the source yields fewer datasets
    /// than there are queried topics.
    pub fn start<G>(&mut self, gateway: &mut G, date: NaiveDate) -> Result<FinalResult>
    where
        G: DatabaseGateway + ?Sized,
    {
        self.begin()?;
        log_operation_start("Building KIS report", date);

        if let Err(err) = gateway.connect() {
            warn!("{err}, emitting placeholder report for {date}");
            self.state = PipelineState::DegradedDone;
            return Ok(self.unavailable_result(date));
        }

        let mut source = DatasetSource::new(gateway, self.config.queries.report_queries(date));
        let outcome = self.aggregate_all(&mut source, date);
        source.close();
        self.finish(outcome)
    }

    /// Aggregate already pulled datasets, one per queried topic in order
    ///
    /// # Errors
    /// Same as [`KisPipeline::start`].
    pub fn process<I>(&mut self, datasets: I, date: NaiveDate) -> Result<FinalResult>
    where
        I: IntoIterator<Item = Dataset>,
    {
        self.begin()?;
        log_operation_start("Building KIS report", date);
        let outcome = self.aggregate_all(&mut datasets.into_iter(), date);
        self.finish(outcome)
    }

    fn begin(&mut self) -> Result<()> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::PreconditionViolated(format!(
                "pipeline already started (state: {})",
                self.state
            )));
        }
        self.state = PipelineState::Running;
        Ok(())
    }

    fn finish(&mut self, outcome: Result<FinalResult>) -> Result<FinalResult> {
        self.state = PipelineState::Done;
        outcome
    }

    /// Final result with every topic in its null shape
    fn unavailable_result(&self, date: NaiveDate) -> FinalResult {
        let mut result = FinalResult::new(date, false);
        for topic in Topic::ALL {
            result.insert(topic, topics::placeholder(topic, self.config, Fill::Null));
        }
        result
    }

    fn aggregate_all<I>(&self, source: &mut I, date: NaiveDate) -> Result<FinalResult>
    where
        I: Iterator<Item = Dataset>,
    {
        let started = Instant::now();
        let mut result = FinalResult::new(date, true);
        let mut acc = OccupancyAccumulator::new();

        for (position, topic) in Topic::QUERIED.into_iter().enumerate() {
            let dataset = source.next().ok_or_else(|| PipelineError::SourceExhausted {
                topic: topic.to_string(),
                position,
            })?;
            debug!("Pulled {} rows for topic '{topic}'", dataset.len());

            if dataset.is_failure(&self.config.failure_marker) {
                self.record_fault(&mut result, topic, FaultKind::QueryFailure);
            }
            let outcome = self.dispatch(topic, &dataset, &mut acc);
            self.settle(&mut result, topic, outcome);
        }

        let summary = occupancy::aggregate(acc, self.config);
        self.settle(&mut result, Topic::IcuOccupancy, summary);

        log_operation_complete(
            "aggregated",
            date,
            Topic::ALL.len() - result.faults().len(),
            Some(started.elapsed()),
        );
        Ok(result)
    }

    fn dispatch(
        &self,
        topic: Topic,
        dataset: &Dataset,
        acc: &mut OccupancyAccumulator,
    ) -> Result<AggregateResult> {
        let config = self.config;
        match topic {
            Topic::Arrivals => arrivals::aggregate(dataset, config),
            Topic::DepartmentOccupancy => departments::aggregate(dataset, config),
            Topic::Discharges => discharges::aggregate(dataset, config),
            Topic::Deaths => deaths::aggregate(dataset, config, acc),
            Topic::IcuArrived | Topic::IcuMoved | Topic::IcuCurrent => {
                let columns = icu::columns_for(topic, config).unwrap_or_default();
                icu::aggregate(dataset, columns, config, acc)
            }
            Topic::IcuOccupancy => Err(PipelineError::PreconditionViolated(
                "the occupancy summary does not consume a dataset".to_string(),
            )),
        }
    }

    /// Insert a topic's result, or its zero shape if aggregation aborted
    fn settle(&self, result: &mut FinalResult, topic: Topic, outcome: Result<AggregateResult>) {
        match outcome {
            Ok(aggregate) => result.insert(topic, aggregate),
            Err(err) => {
                if err.is_configuration_defect() {
                    debug!("Topic '{topic}' needs a deployment configuration fix");
                }
                self.record_fault(result, topic, FaultKind::Aborted(err.to_string()));
                result.insert(topic, topics::placeholder(topic, self.config, Fill::Zero));
            }
        }
    }

    fn record_fault(&self, result: &mut FinalResult, topic: Topic, kind: FaultKind) {
        log_topic_fault(topic, &kind);
        result.record_fault(topic, kind);
    }
}
