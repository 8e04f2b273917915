use kis_pipeline::algorithm::assembler::build;
use kis_pipeline::algorithm::mapping::{LookupTable, flatten_paired};
use kis_pipeline::algorithm::rows::{count, count_by_keywords, filter, reject};
use kis_pipeline::{Dataset, PipelineError, RawRow, Value, row};

fn mixed_datasets() -> Vec<Dataset> {
    vec![
        Dataset::empty(),
        Dataset::new(vec![row![1, "a"], row![0, "b"], row![1, "c"]]),
        Dataset::new(vec![row!["x", 1], row!["y"], RawRow::new(), row!["x", 2]]),
        Dataset::new(vec![row![Value::Null, "a"], row![1, "a"], row![2, "a"]]),
    ]
}

/// Filtering and rejecting on the same value partition the dataset
#[test]
fn test_filter_partitions_dataset() {
    let probes = [Value::Int(1), Value::from("x"), Value::Null, Value::from("missing")];
    for dataset in mixed_datasets() {
        for index in 0..3 {
            for probe in &probes {
                let kept = filter(&dataset, index, probe);
                let dropped = reject(&dataset, index, probe);
                assert_eq!(count(&kept) + count(&dropped), count(&dataset));
            }
        }
    }
}

/// Keyword counts have one entry per keyword and are zero on the sentinel
#[test]
fn test_keyword_counts_width() {
    let keywords = ["a", "b", "c", "d", "e"];
    for dataset in mixed_datasets() {
        for width in 0..=keywords.len() {
            let counts = count_by_keywords(&dataset, 1, &keywords[..width]);
            assert_eq!(counts.len(), width);
        }
    }

    let sentinel = Dataset::failure("Error");
    assert_eq!(count_by_keywords(&sentinel, 0, &keywords[..]), vec![0; 5]);
    assert_eq!(count_by_keywords(&sentinel, 1, &keywords[..]), vec![0; 5]);
}

/// Flattened pairs keep their label to value correspondence
#[test]
fn test_flatten_paired_keeps_pairs() -> kis_pipeline::Result<()> {
    let entries = [("Терапия", "therapy"), ("Хирургия", "surgery"), ("Урология", "urology")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let table = LookupTable::new("profiles", &entries);

    let dataset = Dataset::new(vec![
        row!["Урология", 3],
        row!["Терапия", 11],
        row!["Хирургия", 0],
        row!["Терапия", 4],
    ]);
    let (columns, values) = flatten_paired(&dataset, &table)?;

    assert_eq!(columns.len(), dataset.len());
    assert_eq!(values.len(), dataset.len());
    for (k, row) in dataset.iter().enumerate() {
        let label = row[0].as_text().unwrap();
        assert_eq!(columns[k], table.lookup(label).unwrap());
        assert_eq!(values[k], row[1]);
    }
    Ok(())
}

/// Assembled records expose exactly the column set
#[test]
fn test_build_shapes() {
    let columns = ["pat_fio", "ib_num", "age"];
    let rows = vec![row!["a", "1", 1], row!["b", "2", 2], row!["c", "3", 3]];
    let records = build(&columns, &rows).unwrap();
    assert_eq!(records.len(), rows.len());
    for record in &records {
        let mut keys: Vec<_> = record.columns().collect();
        keys.sort_unstable();
        let mut expected = columns.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    let ragged = vec![row!["a", "1", 1], row!["b", "2"]];
    assert!(matches!(
        build(&columns, &ragged),
        Err(PipelineError::ShapeMismatch { row: 1, expected: 3, actual: 2 })
    ));
}
