use std::fs;
use std::path::Path;

use crunch_core::CrunchError;
use crunch_stats::{aggregate, render_tables, StatsConfig, TableFormat};
use proptest::prelude::*;

fn write_result(dir: &Path, name: &str, times: &[f64]) {
    let body = serde_json::json!({ "times": times });
    fs::write(dir.join(name), body.to_string()).unwrap();
}

fn config(dir: &Path) -> StatsConfig {
    StatsConfig {
        algorithms: vec!["Yjs".into(), "RGA".into()],
        datasets: vec!["ap".into(), "jesus.json".into()],
        tag: "25k".into(),
        results: dir.to_path_buf(),
    }
}

#[test]
fn tables_follow_configuration_order() {
    let dir = tempfile::tempdir().unwrap();
    for alg in ["Yjs", "RGA"] {
        for data in ["ap", "jesus.json"] {
            write_result(dir.path(), &format!("{alg}-{data}-25k-local"), &[1.0, 2.0, 3.0]);
            write_result(dir.path(), &format!("{alg}-{data}-25k-remote"), &[4.0, 4.0]);
        }
    }
    let tables = aggregate(&config(dir.path())).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].dataset, "jesus.json");
    assert_eq!(tables[0].rows[0].name, "Yjs");
    assert_eq!(tables[0].rows[1].local.mean, 2.0);
    assert_eq!(tables[0].rows[1].remote.sum, 8.0);

    let csv = render_tables(&tables, TableFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 1 + 4);
    assert!(csv.contains("jesus.json,RGA,2.00,3.00,1.00,6.00,4.00,4.00,0.00,8.00"));
}

#[test]
fn missing_result_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = aggregate(&config(dir.path())).unwrap_err();
    assert!(matches!(err, CrunchError::Io(_)));
    assert!(err.info().context["path"].ends_with("Yjs-ap-25k-local"));
}

#[test]
fn short_series_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_result(dir.path(), "Yjs-ap-25k-local", &[1.0]);
    let err = aggregate(&config(dir.path())).unwrap_err();
    assert_eq!(err.info().code, "insufficient-samples");
    assert!(err.info().context["path"].ends_with("Yjs-ap-25k-local"));
}

proptest! {
    #[test]
    fn summary_bounds_hold(times in prop::collection::vec(0.0f64..1e6, 2..64)) {
        let summary = crunch_stats::Summary::from_times(&times).unwrap();
        prop_assert!(summary.mean <= summary.max + 1e-9);
        prop_assert!(summary.stdev >= 0.0);
        prop_assert!((summary.sum - summary.mean * times.len() as f64).abs() < 1e-3);
    }
}
