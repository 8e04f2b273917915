use crate::utils::{gateway_for, healthy_fixture, report_date, test_config};
use kis_pipeline::error::PersistenceError;
use kis_pipeline::store::{CacheStore, DMK_KEY, KIS_KEY};
use kis_pipeline::{
    Cacher, DashboardPipeline, KisPipeline, MemoryCache, MemoryStore, PersistenceStore, Value,
};

/// Test the dashboard records built from a healthy day
#[test]
fn test_dashboard_records() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());

    let data = DashboardPipeline::new(&config).run(&mut gateway, report_date())?;

    assert_eq!(data.main.get("dates"), Some(&Value::Date(report_date())));
    assert_eq!(data.main.int("arrived"), Some(4));
    assert_eq!(data.main.int("hosp"), Some(3));
    assert_eq!(data.main.int("refused"), Some(1));
    assert_eq!(data.main.int("signout"), Some(5));
    assert_eq!(data.main.int("deads"), Some(5));
    assert_eq!(data.main.int("reanimation"), Some(2));
    assert_eq!(data.accumulated.len(), 2);
    assert_eq!(gateway.executed(), config.queries.dashboard_queries(report_date()).as_slice());
    assert_eq!(gateway.close_count(), 1);
    Ok(())
}

/// Saving the same day twice rejects only the main record
#[test]
fn test_duplicate_day_is_skipped() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut store = MemoryStore::new().with_profiles(config.lookups.profiles.values().cloned());

    for _ in 0..2 {
        let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
        let data = DashboardPipeline::new(&config).run(&mut gateway, report_date())?;
        data.save(&mut store);
    }

    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
    let report = DashboardPipeline::new(&config)
        .run(&mut gateway, report_date())?
        .save(&mut store);

    assert_eq!(report.rejected, vec![PersistenceError::Duplicate { date: report_date() }]);
    assert_eq!(report.saved, 2);
    assert!(report.rejected[0].deployment_message().contains("unique"));
    assert_eq!(store.main_records().len(), 1);
    assert_eq!(store.accumulated_for(report_date()).len(), 6);
    Ok(())
}

/// A rejected accumulation record does not stop the rest of the batch
#[test]
fn test_rejected_profile_continues() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut store = MemoryStore::new().with_profiles(["therapy"]);
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());

    let report = DashboardPipeline::new(&config)
        .run(&mut gateway, report_date())?
        .save(&mut store);

    assert_eq!(report.saved, 2);
    assert!(matches!(report.rejected.as_slice(), [PersistenceError::Validation(_)]));
    let kept = store.accumulated_for(report_date());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].get("profile").unwrap(), "therapy");
    Ok(())
}

/// Failed dashboard queries are stored as NULL counts
#[test]
fn test_unavailable_source_saves_nulls() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut gateway = kis_pipeline::ReplayGateway::new(&config.failure_marker).unavailable();
    let mut store = MemoryStore::new();

    let data = DashboardPipeline::new(&config).run(&mut gateway, report_date())?;
    let report = data.save(&mut store);

    assert!(report.is_clean());
    let stored = store.main_records();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get("arrived"), Some(&Value::Null));
    assert!(store.accumulated_for(report_date()).is_empty());
    Ok(())
}

/// The day cache is filled on the first call and read afterwards
#[test]
fn test_cache_written_once_per_day() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut store = MemoryStore::new();
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
    DashboardPipeline::new(&config)
        .run(&mut gateway, report_date())?
        .save(&mut store);

    let mut cache = MemoryCache::new();
    let mut kis_runs = 0;
    for _ in 0..3 {
        Cacher::new(&mut cache, &store).ensure_cached(report_date(), || {
            kis_runs += 1;
            let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
            KisPipeline::new(&config).start(&mut gateway, report_date())
        })?;
    }

    assert_eq!(kis_runs, 1);
    assert_eq!(cache.writes(), 2);

    let dmk = cache.get(DMK_KEY).unwrap();
    assert_eq!(dmk["main"][0]["arrived"], 4);
    assert_eq!(dmk["accum_dmk"].as_array().map(Vec::len), Some(2));
    assert_eq!(cache.get(KIS_KEY).unwrap()["signout"]["surgery_d"], 2);

    cache.clear();
    let fill = Cacher::new(&mut cache, &store).ensure_cached(report_date(), || {
        let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
        KisPipeline::new(&config).start(&mut gateway, report_date())
    })?;
    assert!(fill.dmk && fill.kis);
    Ok(())
}
