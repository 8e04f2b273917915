//! In-memory gateway that replays recorded datasets
//!
//! Used by the CLI to run the pipeline against exported result sets and by
//! the tests. Responses are keyed by the exact query text; a query without a
//! recorded response is answered with the failure sentinel, the same way a
//! live gateway answers a query that could not execute.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::queries::{QuerySet, render};
use crate::error::{PipelineError, Result};
use crate::gateway::DatabaseGateway;
use crate::models::Dataset;

/// Recorded datasets keyed by query name (`arrived`, `dept_hosp`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicFixture {
    datasets: BTreeMap<String, Dataset>,
}

impl TopicFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dataset answering a named query
    #[must_use]
    pub fn with(mut self, name: &str, dataset: Dataset) -> Self {
        self.datasets.insert(name.to_string(), dataset);
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }
}

/// Gateway answering from recorded datasets
#[derive(Debug, Clone, Default)]
pub struct ReplayGateway {
    failure_marker: String,
    responses: FxHashMap<String, Dataset>,
    available: bool,
    connected: bool,
    executed: Vec<String>,
    close_count: usize,
}

impl ReplayGateway {
    /// Create an available gateway with no recorded responses
    #[must_use]
    pub fn new(failure_marker: &str) -> Self {
        Self {
            failure_marker: failure_marker.to_string(),
            available: true,
            ..Self::default()
        }
    }

    /// Build a gateway answering the date-specific queries of `queries`
    /// from a fixture
    #[must_use]
    pub fn for_fixture(
        fixture: &TopicFixture,
        queries: &QuerySet,
        date: NaiveDate,
        failure_marker: &str,
    ) -> Self {
        queries
            .named()
            .into_iter()
            .filter_map(|(name, template)| {
                fixture
                    .get(name)
                    .map(|dataset| (render(template, date), dataset.clone()))
            })
            .fold(Self::new(failure_marker), |gateway, (query, dataset)| {
                gateway.with_response(&query, dataset)
            })
    }

    /// Record the answer to a query
    #[must_use]
    pub fn with_response(mut self, query: &str, dataset: Dataset) -> Self {
        self.responses.insert(query.to_string(), dataset);
        self
    }

    /// Make every connection attempt fail
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Queries executed so far, in order
    #[must_use]
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    #[must_use]
    pub const fn close_count(&self) -> usize {
        self.close_count
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }
}

impl DatabaseGateway for ReplayGateway {
    fn connect(&mut self) -> Result<()> {
        if !self.available {
            return Err(PipelineError::SourceUnavailable(
                "replay gateway marked unavailable".to_string(),
            ));
        }
        self.connected = true;
        Ok(())
    }

    fn execute(&mut self, query: &str) -> Dataset {
        self.executed.push(query.to_string());
        if !self.connected {
            warn!("Query executed without a connection");
            return Dataset::failure(&self.failure_marker);
        }
        match self.responses.get(query) {
            Some(dataset) => dataset.clone(),
            None => {
                warn!("No recorded response for query: {query}");
                Dataset::failure(&self.failure_marker)
            }
        }
    }

    fn close(&mut self) {
        self.connected = false;
        self.close_count += 1;
    }
}
