use crate::utils::{gateway_for, healthy_fixture, report_date, test_config, test_data_dir};
use kis_pipeline::algorithm::rows::{count, count_by_keywords};
use kis_pipeline::gateway::DatasetSource;
use kis_pipeline::models::FaultKind;
use kis_pipeline::{
    AggregateResult, Dataset, KisPipeline, PipelineConfig, PipelineState, ReplayGateway, Topic,
    TopicFixture, Value, row,
};

fn summary(result: &kis_pipeline::FinalResult, topic: Topic) -> &kis_pipeline::Record {
    result
        .get(topic)
        .and_then(AggregateResult::as_summary)
        .unwrap_or_else(|| panic!("{topic} should be a summary"))
}

fn occupancy(result: &kis_pipeline::FinalResult, key: &str) -> Vec<Option<i64>> {
    let record = result
        .get(Topic::IcuOccupancy)
        .and_then(|r| r.keyed(key))
        .unwrap_or_else(|| panic!("missing occupancy entry {key}"));
    ["oar1", "oar2", "oar3"].iter().map(|c| record.int(c)).collect()
}

/// Test a run where every query succeeds
#[test]
fn test_healthy_report() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
    let mut pipeline = KisPipeline::new(&config);

    let result = pipeline.start(&mut gateway, report_date())?;

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert!(result.source_available());
    assert!(result.faults().is_empty());
    assert_eq!(result.topics().collect::<Vec<_>>(), Topic::ALL.to_vec());
    assert_eq!(gateway.executed(), config.queries.report_queries(report_date()).as_slice());
    assert_eq!(gateway.close_count(), 1);

    let arrivals = summary(&result, Topic::Arrivals);
    assert_eq!(arrivals.int("ch103"), Some(1));
    assert_eq!(arrivals.int("clinic_only"), Some(1));
    assert_eq!(arrivals.int("ch103_clinic"), Some(0));
    assert_eq!(arrivals.int("singly"), Some(1));
    assert_eq!(arrivals.int("ZL"), Some(1));
    assert_eq!(arrivals.int("moscow"), Some(1));

    let departments = summary(&result, Topic::DepartmentOccupancy);
    assert_eq!(departments.int("therapy"), Some(14));
    assert_eq!(departments.int("surgery"), Some(9));

    let discharges = summary(&result, Topic::Discharges);
    assert_eq!(discharges.int("deads"), Some(1));
    assert_eq!(discharges.int("moved"), Some(1));
    assert_eq!(discharges.int("signout"), Some(3));
    assert_eq!(discharges.int("surgery_d"), Some(2));
    assert_eq!(discharges.int("therapy_d"), Some(1));
    assert_eq!(discharges.get("cardio_d"), None);

    let deaths = result.get(Topic::Deaths).and_then(AggregateResult::as_table).unwrap();
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].get("dept").unwrap(), "ОРИТ №2");

    assert_eq!(occupancy(&result, "arrived_nums"), vec![Some(2), Some(0), Some(0)]);
    assert_eq!(occupancy(&result, "moved_nums"), vec![Some(0), Some(0), Some(1)]);
    assert_eq!(occupancy(&result, "current_nums"), vec![Some(1), Some(0), Some(1)]);
    assert_eq!(occupancy(&result, "deads_nums"), vec![Some(0), Some(1), Some(0)]);
    Ok(())
}

/// Admitted arrivals counted per channel and per patient type
#[test]
fn test_arrivals_scenario() -> kis_pipeline::Result<()> {
    let mut config = PipelineConfig::default();
    config.keywords.channels = vec!["103".into(), "Поликлиника".into()];
    config.keywords.statuses = vec!["ЗЛ".into()];
    config.columns.arrived = vec!["ch103".into(), "clinic_only".into(), "ZL".into()];

    let fixture = healthy_fixture().with(
        "arrived",
        Dataset::new(vec![
            row![1, "Cardiology", "103", "ЗЛ"],
            row![1, "Cardiology", "Поликлиника", "НР"],
            row![0, "Reception", "103", "НР"],
        ]),
    );
    let mut gateway = gateway_for(&fixture, &config, report_date());
    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;

    let arrivals = summary(&result, Topic::Arrivals);
    assert_eq!(arrivals.len(), 3);
    assert_eq!(arrivals.int("ch103"), Some(1));
    assert_eq!(arrivals.int("clinic_only"), Some(1));
    assert_eq!(arrivals.int("ZL"), Some(1));
    Ok(())
}

/// Outcome totals over the whole discharges dataset
#[test]
fn test_discharges_scenario() -> kis_pipeline::Result<()> {
    let mut config = PipelineConfig::default();
    config.keywords.outcomes = vec!["Умер".into(), "Выписан".into()];
    config.columns.signout = vec!["deads".into(), "signout".into()];

    let fixture = healthy_fixture().with(
        "signout",
        Dataset::new(vec![
            row!["Кардиологическое отделение", "Умер"],
            row!["Хирургическое отделение", "Выписан"],
            row!["Хирургическое отделение", "Выписан"],
        ]),
    );
    let mut gateway = gateway_for(&fixture, &config, report_date());
    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;

    let discharges = summary(&result, Topic::Discharges);
    assert_eq!(discharges.int("deads"), Some(1));
    assert_eq!(discharges.int("signout"), Some(2));
    assert_eq!(discharges.int("surgery_d"), Some(2));
    assert_eq!(discharges.len(), 3);

    let signout = fixture.get("signout").unwrap();
    let totals = count_by_keywords(signout, config.positions.outcome, &config.keywords.outcomes);
    assert_eq!(totals, vec![1, 2]);
    assert_eq!(count(signout), 3);
    Ok(())
}

/// An unreachable source yields every topic in its null shape
#[test]
fn test_unavailable_source_report() -> kis_pipeline::Result<()> {
    let config = test_config();
    let mut gateway = ReplayGateway::new(&config.failure_marker).unavailable();
    let mut pipeline = KisPipeline::new(&config);

    let result = pipeline.start(&mut gateway, report_date())?;

    assert_eq!(pipeline.state(), PipelineState::DegradedDone);
    assert!(gateway.executed().is_empty());
    for topic in Topic::ALL {
        assert!(result.get(topic).is_some(), "{topic} missing");
        assert!(result.is_degraded(topic));
    }

    let arrivals = summary(&result, Topic::Arrivals);
    assert_eq!(arrivals.len(), config.columns.arrived.len());
    assert!(arrivals.iter().all(|(_, v)| v.is_null()));
    assert_eq!(
        result.get(Topic::Deaths).and_then(AggregateResult::as_table).map(<[_]>::len),
        Some(0)
    );
    assert_eq!(occupancy(&result, "current_nums"), vec![None, None, None]);
    assert_eq!(
        result.get(Topic::IcuOccupancy).and_then(|r| r.keyed("deads_nums")).and_then(|r| r.get("oar1")),
        Some(&Value::Null)
    );

    let json = result.to_json()?;
    assert_eq!(json.as_object().map(serde_json::Map::len), Some(Topic::ALL.len()));
    Ok(())
}

/// A failed query degrades only its own topic
#[test]
fn test_single_query_failure() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = healthy_fixture().with("signout", Dataset::failure(&config.failure_marker));
    let mut gateway = gateway_for(&fixture, &config, report_date());

    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;

    assert_eq!(result.faults().len(), 1);
    assert_eq!(result.faults()[0].topic, Topic::Discharges);
    assert_eq!(result.faults()[0].kind, FaultKind::QueryFailure);

    let discharges = summary(&result, Topic::Discharges);
    assert_eq!(discharges.len(), config.columns.signout.len());
    assert!(discharges.iter().all(|(_, v)| *v == Value::Int(0)));

    assert!(!result.is_degraded(Topic::Arrivals));
    assert_eq!(summary(&result, Topic::Arrivals).int("ch103"), Some(1));
    assert_eq!(summary(&result, Topic::DepartmentOccupancy).int("therapy"), Some(14));
    assert_eq!(occupancy(&result, "arrived_nums"), vec![Some(2), Some(0), Some(0)]);
    Ok(())
}

/// A failed ICU listing still reports zero counts to the occupancy summary
#[test]
fn test_failed_listing_keeps_occupancy_shape() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = healthy_fixture().with("oar_moved", Dataset::failure(&config.failure_marker));
    let mut gateway = gateway_for(&fixture, &config, report_date());

    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;

    assert_eq!(occupancy(&result, "moved_nums"), vec![Some(0), Some(0), Some(0)]);
    assert_eq!(occupancy(&result, "current_nums"), vec![Some(1), Some(0), Some(1)]);
    assert!(!result.is_degraded(Topic::IcuOccupancy));
    Ok(())
}

/// Occupancy counts do not carry over between runs
#[test]
fn test_runs_do_not_share_counts() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = healthy_fixture();

    let mut first_gateway = gateway_for(&fixture, &config, report_date());
    let first = KisPipeline::new(&config).start(&mut first_gateway, report_date())?;
    let mut second_gateway = gateway_for(&fixture, &config, report_date());
    let second = KisPipeline::new(&config).start(&mut second_gateway, report_date())?;

    assert_eq!(first, second);
    assert_eq!(occupancy(&second, "arrived_nums"), vec![Some(2), Some(0), Some(0)]);
    Ok(())
}

/// Abandoning the source early releases the gateway once
#[test]
fn test_abandoned_source_closes_once() -> kis_pipeline::Result<()> {
    use kis_pipeline::DatabaseGateway;

    let config = test_config();
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());
    gateway.connect()?;
    {
        let mut source = DatasetSource::new(&mut gateway, config.queries.report_queries(report_date()));
        assert!(source.next().is_some());
        assert!(source.next().is_some());
        assert_eq!(source.remaining(), 5);
    }
    assert_eq!(gateway.close_count(), 1);
    assert_eq!(gateway.executed().len(), 2);
    Ok(())
}

/// A department label missing from the lookup table aborts only that topic
#[test]
fn test_unmapped_department() -> kis_pipeline::Result<()> {
    let mut config = test_config();
    config.lookups.departments.remove("Терапевтическое отделение");
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());

    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;

    assert_eq!(result.faults().len(), 1);
    let fault = &result.faults()[0];
    assert_eq!(fault.topic, Topic::Discharges);
    assert!(matches!(&fault.kind, FaultKind::Aborted(msg) if msg.contains("Терапевтическое отделение")));
    assert_eq!(summary(&result, Topic::Discharges).int("signout"), Some(0));
    assert_eq!(gateway.close_count(), 1);
    Ok(())
}

/// A department mapped onto a totals column aborts only the discharges topic
#[test]
fn test_colliding_department_column() -> kis_pipeline::Result<()> {
    let mut config = test_config();
    config.add_department("Хирургическое отделение", "signout");
    let mut gateway = gateway_for(&healthy_fixture(), &config, report_date());

    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;

    assert_eq!(result.faults().len(), 1);
    assert_eq!(result.faults()[0].topic, Topic::Discharges);
    assert!(matches!(&result.faults()[0].kind, FaultKind::Aborted(msg) if msg.contains("signout")));
    assert_eq!(summary(&result, Topic::Discharges).int("signout"), Some(0));
    assert_eq!(summary(&result, Topic::Arrivals).int("ch103"), Some(1));
    Ok(())
}

/// Datasets recorded as JSON drive the same report
#[test]
fn test_report_from_json_fixture() -> kis_pipeline::Result<()> {
    let config = test_config();
    let fixture = TopicFixture::from_json_file(&test_data_dir().join("report_fixture.json"))?;
    let mut gateway = gateway_for(&fixture, &config, report_date());

    let result = KisPipeline::new(&config).start(&mut gateway, report_date())?;
    let json = result.to_json()?;

    assert_eq!(json["arrived"]["ch103"], 2);
    assert_eq!(json["signout"]["signout"], 1);
    assert_eq!(json["oar_numbers"]["current_nums"]["oar2"], 1);
    assert_eq!(json["oar_current"][0]["pat_fio"], "Кузнецов К.К.");
    assert!(result.faults().is_empty());
    Ok(())
}
