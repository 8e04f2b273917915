//! Daily dashboard run
//!
//! Pulls the arrivals, discharges, intensive care arrivals and department
//! hospitalisation datasets, builds the day's main record and the
//! per-profile accumulation records, and saves them record by record.

use chrono::NaiveDate;
use log::{error, info, warn};

use crate::algorithm::dashboard::{
    accumulated_records, arrival_counts, main_record, reanimation_count, signout_counts,
    unavailable_record,
};
use crate::config::PipelineConfig;
use crate::error::{PersistenceError, PipelineError, Result};
use crate::gateway::{DatabaseGateway, DatasetSource};
use crate::models::{Dataset, Record};
use crate::store::PersistenceStore;
use crate::utils::logging::log_warning;

/// Names of the dashboard queries, in submission order
const DASHBOARD_QUERIES: [&str; 4] = ["arrived", "signout", "oar_arrived", "dept_hosp"];

/// Records produced by one dashboard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub date: NaiveDate,
    pub main: Record,
    pub accumulated: Vec<Record>,
}

/// Outcome of saving one day of dashboard records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: usize,
    pub rejected: Vec<PersistenceError>,
}

impl SaveReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    fn absorb(&mut self, kind: &str, outcome: std::result::Result<(), PersistenceError>) {
        match outcome {
            Ok(()) => {
                self.saved += 1;
                info!("Saved {kind} record");
            }
            Err(err) => {
                error!("{}", err.deployment_message());
                self.rejected.push(err);
            }
        }
    }
}

impl DashboardData {
    /// Persist the main record and every accumulation record
    ///
    /// Each record is inserted on its own; a rejected record is logged and
    /// skipped and the rest are still written.
    pub fn save<S: PersistenceStore + ?Sized>(&self, store: &mut S) -> SaveReport {
        let mut report = SaveReport::default();

        if self.main.has_nulls() {
            log_warning("Main record contains NULL values", Some(self.date));
        }
        report.absorb("main", store.insert_main(&self.main));

        for record in &self.accumulated {
            report.absorb("accumulated", store.insert_accumulated(record));
        }
        report
    }
}

/// Dashboard pipeline over a database gateway
#[derive(Debug, Clone, Copy)]
pub struct DashboardPipeline<'c> {
    config: &'c PipelineConfig,
}

impl<'c> DashboardPipeline<'c> {
    #[must_use]
    pub const fn new(config: &'c PipelineConfig) -> Self {
        Self { config }
    }

    /// Build the dashboard records for `date`
    ///
    /// An unavailable source yields a main record with every count NULL and
    /// no accumulation records.
    ///
    /// # Errors
    /// [`PipelineError::SourceExhausted`] if the source answers fewer queries
    /// than were submitted.
    pub fn run<G>(&self, gateway: &mut G, date: NaiveDate) -> Result<DashboardData>
    where
        G: DatabaseGateway + ?Sized,
    {
        if let Err(err) = gateway.connect() {
            warn!("{err}, saving NULL dashboard counts for {date}");
            return Ok(DashboardData {
                date,
                main: unavailable_record(date),
                accumulated: Vec::new(),
            });
        }

        let mut source = DatasetSource::new(gateway, self.config.queries.dashboard_queries(date));
        let outcome = pull_all(&mut source);
        source.close();
        let [arrivals, signout, reanimation, dept_hosp] = outcome?;

        let config = self.config;
        Ok(DashboardData {
            date,
            main: main_record(
                date,
                arrival_counts(&arrivals, config),
                signout_counts(&signout, config),
                reanimation_count(&reanimation, config),
            ),
            accumulated: accumulated_records(&dept_hosp, date, config),
        })
    }
}

fn pull_all<I: Iterator<Item = Dataset>>(source: &mut I) -> Result<[Dataset; 4]> {
    let mut pull = |position: usize| {
        source.next().ok_or_else(|| PipelineError::SourceExhausted {
            topic: DASHBOARD_QUERIES[position].to_string(),
            position,
        })
    };
    Ok([pull(0)?, pull(1)?, pull(2)?, pull(3)?])
}
