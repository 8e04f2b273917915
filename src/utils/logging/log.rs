//! Logging utilities
//!
//! Standardized messages for pipeline runs and topic aggregation.

use std::time::Duration;

use chrono::NaiveDate;

use crate::models::{FaultKind, Topic};

/// Log the start of a run with consistent format
///
/// # Arguments
/// * `operation` - Description of the run
/// * `date` - Report date the run covers
pub fn log_operation_start(operation: &str, date: NaiveDate) {
    log::info!("{operation} for {date}");
}

/// Log the completion of a run with consistent format
///
/// # Arguments
/// * `operation` - Description of the run
/// * `date` - Report date the run covered
/// * `items` - Number of topics or records produced
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    date: NaiveDate,
    items: usize,
    elapsed: Option<Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} items for {date} in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} items for {date}");
    }
}

/// Log a topic emitted in its degraded shape
pub fn log_topic_fault(topic: Topic, kind: &FaultKind) {
    match kind {
        FaultKind::QueryFailure => {
            log::warn!("Query for topic '{topic}' failed, emitting placeholder values");
        }
        FaultKind::Aborted(reason) => {
            log::error!("Topic '{topic}' aborted: {reason}");
        }
    }
}

/// Log a warning with an optional date
pub fn log_warning(message: &str, date: Option<NaiveDate>) {
    if let Some(date) = date {
        log::warn!("{message}: {date}");
    } else {
        log::warn!("{message}");
    }
}
