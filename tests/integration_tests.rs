//! Integration test.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use failure::Error;
use tempfile::TempDir;

use sensor_stats::{Config, Cutoff, KeyedAggregateMap, PipelineError, Pool, Sensor};


fn config_in(dir: &TempDir) -> Config {
    Config::new(dir.path().join("devices.csv"), dir.path().join("resumo.csv")).with_echo(false)
}

fn assert_same(expect: &KeyedAggregateMap, actual: &KeyedAggregateMap) {
    assert_eq!(expect.len(), actual.len());

    for (key, aggregate) in expect.iter() {
        let other = actual.get(key).expect("key missing from merged map");
        assert_eq!(other.min, aggregate.min, "min of {}", key);
        assert_eq!(other.max, aggregate.max, "max of {}", key);
        assert_eq!(other.count, aggregate.count, "count of {}", key);
        assert!(
            (other.sum - aggregate.sum).abs() <= 1e-9 * aggregate.sum.abs().max(1.0),
            "sum of {}",
            key
        );
    }
}

#[test]
fn test_single_device_month() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir);

    csv_generator::write_table(
        &config.input,
        &[
            "1|A|1|2024-03-01 08:00:00|1.0|0.0|0.0|0.0|0.0|0.0".to_string(),
            "2|A|2|2024-03-15 08:00:00|2.0|0.0|0.0|0.0|0.0|0.0".to_string(),
            "3|A|3|2024-03-31 08:00:00|3.0|0.0|0.0|0.0|0.0|0.0".to_string(),
        ],
    )?;

    let summary = sensor_stats::summarize(&config)?;

    assert_eq!(summary.records, 3);
    assert_eq!(summary.rows, 6);

    let table = fs::read_to_string(&config.output)?;
    let lines: Vec<_> = table.lines().collect();

    assert_eq!(
        lines[0],
        "device;ano-mes;sensor;valor_maximo;valor_medio;valor_minimo"
    );
    assert!(lines.contains(&"A;2024-03;temperatura;3.00;2.00;1.00"));
    assert!(lines.contains(&"A;2024-03;etvoc;0.00;0.00;0.00"));
    assert_eq!(lines.len(), 7);

    Ok(())
}

#[test]
fn test_date_cutoff_boundary() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir);

    csv_generator::write_table(
        &config.input,
        &[
            "1|in|1|2024-03-01|1|1|1|1|1|1".to_string(),
            "2|leap|1|2024-02-29|1|1|1|1|1|1".to_string(),
            "3|old|1|2023-12-31|1|1|1|1|1|1".to_string(),
        ],
    )?;

    let summary = sensor_stats::summarize(&config)?;

    assert_eq!(summary.records, 1);
    assert!(summary.map.iter().all(|(key, _)| &*key.device == "in"));

    Ok(())
}

#[test]
fn test_custom_cutoff() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir).with_cutoff(Cutoff::new(2024, 4));

    csv_generator::write_table(
        &config.input,
        &[
            "1|march|1|2024-03-31|1|1|1|1|1|1".to_string(),
            "2|april|1|2024-04-01|2|2|2|2|2|2".to_string(),
            "3|later|1|2025-01-15|3|3|3|3|3|3".to_string(),
        ],
    )?;

    let summary = sensor_stats::summarize(&config)?;

    assert_eq!(summary.records, 2);
    assert!(summary.map.iter().all(|(key, _)| &*key.device != "march"));

    let table = fs::read_to_string(&config.output)?;
    assert!(table.contains("april;2024-04;temperatura;2.00;2.00;2.00\n"));
    assert!(!table.contains("march"));

    Ok(())
}

#[test]
fn test_no_record_after_cutoff_is_fatal() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir);

    csv_generator::write_table(
        &config.input,
        &[
            "1|A|1|2024-02-29|1|1|1|1|1|1".to_string(),
            "2|A|1|2020-07-01|1|1|1|1|1|1".to_string(),
        ],
    )?;

    let error = sensor_stats::summarize(&config).unwrap_err();

    match error.downcast_ref::<PipelineError>() {
        Some(PipelineError::NoRecords { cutoff }) => assert_eq!(*cutoff, Cutoff::default()),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!config.output.exists());

    Ok(())
}

#[test]
fn test_only_malformed_lines_is_fatal() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir);

    csv_generator::write_table(
        &config.input,
        &[
            "1|A|1|2024-05-01|1|1|1".to_string(),
            "2|A|1|yesterday|1|1|1|1|1|1".to_string(),
        ],
    )?;

    assert!(sensor_stats::summarize(&config).is_err());
    assert!(!config.output.exists());

    Ok(())
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    assert!(sensor_stats::summarize(&config).is_err());
    assert!(!config.output.exists());
}

#[test]
fn test_partition_invariance() -> Result<(), Error> {
    let records = csv_generator::random_records(42, 2_000);

    let reference = sensor_stats::aggregate(&records, &Pool::with_size(1))?;

    for workers in 2..=9 {
        let merged = sensor_stats::aggregate(&records, &Pool::with_size(workers))?;
        assert_same(&reference, &merged);
    }

    assert_same(&reference, &sensor_stats::aggregate(&records, &Pool::detect())?);

    Ok(())
}

#[test]
fn test_count_conservation_and_bounds() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir).with_workers(4);

    let records = csv_generator::random_records(7, 1_500);
    csv_generator::write_records(&config.input, &records)?;

    let summary = sensor_stats::summarize(&config)?;

    let cutoff = Cutoff::default();
    let mut expected: HashMap<(String, i32, u32), u64> = HashMap::new();
    for record in records.iter().filter(|r| cutoff.includes(r.year, r.month)) {
        *expected
            .entry((record.device.to_string(), record.year, record.month))
            .or_insert(0) += 1;
    }

    assert_eq!(summary.map.len(), expected.len() * Sensor::ALL.len());
    assert_eq!(summary.records as u64, expected.values().sum::<u64>());

    for (key, aggregate) in summary.map.iter() {
        let group = (key.device.to_string(), key.year, key.month);
        assert_eq!(Some(&aggregate.count), expected.get(&group), "count of {}", key);

        let mean = aggregate.mean();
        assert!(aggregate.min <= mean + 1e-9, "min above mean for {}", key);
        assert!(mean <= aggregate.max + 1e-9, "mean above max for {}", key);
    }

    let table = fs::read_to_string(&config.output)?;
    assert_eq!(table.lines().count(), summary.rows + 1);

    Ok(())
}

#[test]
fn test_fixture_table() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("resumo.csv");
    let config = Config::new(Path::new("data/devices.csv"), &output)
        .with_workers(3)
        .with_echo(false);

    let summary = sensor_stats::summarize(&config)?;

    // The 2024-02 line is dropped by the cutoff and the broken line is skipped.
    assert_eq!(summary.records, 5);

    let table = fs::read_to_string(&output)?;
    assert_eq!(table, fs::read_to_string("data/resumo.csv")?);

    Ok(())
}
