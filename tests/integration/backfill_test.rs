use chrono::NaiveDate;

use crate::utils::{gateway_for, healthy_fixture, test_config};
use kis_pipeline::backfill::{BackfillOptions, backfill, dates_period};
use kis_pipeline::{MemoryStore, PersistenceStore, PipelineError, ReplayGateway, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
}

/// Test a three-day backfill over healthy data
#[test]
fn test_backfill_fills_each_day() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = healthy_fixture();
    let mut store = MemoryStore::new();
    let mut connected = Vec::new();

    let report = backfill(
        &config,
        |date| {
            connected.push(date);
            gateway_for(&fixture, &config, date)
        },
        &mut store,
        BackfillOptions::new(today(), 3),
    )?;

    assert_eq!(connected, dates_period(today(), 3));
    assert_eq!(connected[0], NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    assert_eq!(report.days, 3);
    assert_eq!(report.saved, 9);
    assert_eq!(report.rejected, 0);
    assert!(report.failed_days.is_empty());

    let dates: Vec<_> = store
        .main_records()
        .iter()
        .filter_map(|r| r.get("dates").and_then(Value::as_date))
        .collect();
    assert_eq!(dates, connected);
    Ok(())
}

/// An unavailable day is stored as NULL counts and the rest continue
#[test]
fn test_backfill_continues_past_unavailable_day() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = healthy_fixture();
    let broken = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut store = MemoryStore::new();

    let report = backfill(
        &config,
        |date| {
            if date == broken {
                ReplayGateway::new(&config.failure_marker).unavailable()
            } else {
                gateway_for(&fixture, &config, date)
            }
        },
        &mut store,
        BackfillOptions::new(today(), 3),
    )?;

    assert_eq!(report.saved, 7);
    let stored = store.main_records();
    assert_eq!(stored.len(), 3);
    assert!(stored[1].has_nulls());
    assert!(store.accumulated_for(broken).is_empty());
    Ok(())
}

/// Repeating a backfill rejects the days already stored
#[test]
fn test_backfill_twice_reports_duplicates() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = healthy_fixture();
    let mut store = MemoryStore::new();
    let options = BackfillOptions::new(today(), 2);

    backfill(&config, |date| gateway_for(&fixture, &config, date), &mut store, options)?;
    let again = backfill(&config, |date| gateway_for(&fixture, &config, date), &mut store, options)?;

    assert_eq!(again.rejected, 2);
    assert_eq!(store.main_records().len(), 2);
    Ok(())
}

/// An invalid configuration aborts before any day runs
#[test]
fn test_backfill_rejects_invalid_config() {
    let mut config = test_config();
    config.keywords.icu_units.clear();
    let mut store = MemoryStore::new();

    let result = backfill(
        &config,
        |date| gateway_for(&healthy_fixture(), &config, date),
        &mut store,
        BackfillOptions::new(today(), 2),
    );

    assert!(matches!(result, Err(PipelineError::Config(_))));
    assert!(store.main_records().is_empty());
}
