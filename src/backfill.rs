//! Period backfill
//!
//! Fills the dashboard store for a run of past days, one dashboard run per
//! day with its own gateway connection. Rejected records do not stop the
//! remaining days.

use std::time::Instant;

use chrono::{Days, NaiveDate};
use log::{debug, error};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::gateway::DatabaseGateway;
use crate::pipeline::DashboardPipeline;
use crate::store::PersistenceStore;
use crate::utils::logging::{
    create_hidden_progress_bar, create_main_progress_bar, finish_progress_bar,
    log_operation_complete, log_operation_start,
};

/// The `days` dates ending yesterday, oldest first
#[must_use]
pub fn dates_period(today: NaiveDate, days: u64) -> Vec<NaiveDate> {
    (1..=days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Totals of one backfill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub days: usize,
    pub saved: usize,
    pub rejected: usize,
    /// Days whose run failed before anything could be saved
    pub failed_days: Vec<NaiveDate>,
}

/// Options for [`backfill`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillOptions {
    pub today: NaiveDate,
    pub days: u64,
    pub show_progress: bool,
}

impl BackfillOptions {
    #[must_use]
    pub const fn new(today: NaiveDate, days: u64) -> Self {
        Self {
            today,
            days,
            show_progress: false,
        }
    }

    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Run the dashboard pipeline for every day of the period and save the results
///
/// `connect` is called once per day and returns the gateway for that day.
///
/// # Errors
/// Only configuration problems abort the backfill; per-day failures are
/// counted in the report.
pub fn backfill<G, F, S>(
    config: &PipelineConfig,
    mut connect: F,
    store: &mut S,
    options: BackfillOptions,
) -> Result<BackfillReport>
where
    G: DatabaseGateway,
    F: FnMut(NaiveDate) -> G,
    S: PersistenceStore + ?Sized,
{
    config.validate()?;
    let started = Instant::now();
    let dates = dates_period(options.today, options.days);
    log_operation_start(&format!("Backfilling {} days up to", dates.len()), options.today);

    let pb = if options.show_progress {
        create_main_progress_bar(dates.len() as u64, Some("backfill"))
    } else {
        create_hidden_progress_bar(dates.len() as u64)
    };

    let pipeline = DashboardPipeline::new(config);
    let mut report = BackfillReport {
        days: dates.len(),
        ..BackfillReport::default()
    };

    for date in dates {
        pb.set_message(date.to_string());
        let mut gateway = connect(date);
        match pipeline.run(&mut gateway, date) {
            Ok(data) => {
                let saved = data.save(store);
                debug!("{date}: {} saved, {} rejected", saved.saved, saved.rejected.len());
                report.saved += saved.saved;
                report.rejected += saved.rejected.len();
            }
            Err(err) => {
                error!("Dashboard run for {date} failed: {err}");
                report.failed_days.push(date);
            }
        }
        pb.inc(1);
    }

    finish_progress_bar(&pb, "backfill complete");
    log_operation_complete("saved", options.today, report.saved, Some(started.elapsed()));
    Ok(report)
}
