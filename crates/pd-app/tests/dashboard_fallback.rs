use pd_app::*;
use std::fs;

struct Unavailable;

impl SummarySource for Unavailable {
    fn fetch(&self) -> AppResult<UpstreamSummary> {
        Err(AppError::Upstream("connection refused".to_string()))
    }
}

#[test]
fn upstream_failure_yields_documented_defaults() {
    let summary = fetch_summary(&Unavailable, &SummaryDefaults::default());

    assert_eq!(summary.total_potholes_detected, 120);
    assert_eq!(summary.total_reports_generated, 45);
    assert_eq!(summary.total_repairs_completed, 30);
    assert!(summary.volume_totals.is_empty());
    assert!(summary.from_fallback);
}

#[test]
fn unreadable_summary_file_degrades_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("summary.json");
    fs::write(&path, "{ not json").unwrap();

    let summary = fetch_summary(&JsonSummarySource::new(&path), &SummaryDefaults::default());
    assert_eq!(summary, DashboardSummary::fallback(&SummaryDefaults::default()));

    let missing = JsonSummarySource::new(tmp.path().join("absent.json"));
    assert!(fetch_summary(&missing, &SummaryDefaults::default()).from_fallback);
}

#[test]
fn json_summary_is_used_when_present() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("summary.json");
    fs::write(
        &path,
        r#"{
            "potholesDetected": 9,
            "reportsGenerated": 2,
            "volumeTotals": [{"fileName": "a.csv", "totalVolume": 1.5}]
        }"#,
    )
    .unwrap();

    let summary = fetch_summary(&JsonSummarySource::new(&path), &SummaryDefaults::default());
    assert_eq!(summary.total_potholes_detected, 9);
    assert_eq!(summary.total_reports_generated, 2);
    assert_eq!(summary.total_repairs_completed, 30);
    assert_eq!(summary.volume_totals.len(), 1);

    let rows = cost_table(&summary, &pd_core::CostRates::default());
    assert_eq!(rows[0].total_cost, "22.50");
}

#[test]
fn store_summary_counts_records_and_reports() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("a.csv"), "h\n1,0.5,0.1,t\n2,0.5,0.1,t\n").unwrap();
    fs::write(tmp.path().join("b.csv"), "h\n1,0.25,0.1,t\n").unwrap();

    let config = AppConfig {
        reports_dir: tmp.path().to_path_buf(),
        ..AppConfig::default()
    };
    let source = source_for(&config);
    let summary = fetch_summary(&*source, &config.dashboard.defaults);

    assert_eq!(summary.total_potholes_detected, 3);
    assert_eq!(summary.total_reports_generated, 2);
    assert_eq!(summary.total_repairs_completed, 30);
    assert_eq!(summary.volume_totals[0].total_volume, 1.0);
    assert_eq!(summary.volume_totals[1].file_name, "b.csv");
}

#[test]
fn unreadable_report_directory_degrades_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let not_a_dir = tmp.path().join("csv");
    fs::write(&not_a_dir, "plain file").unwrap();

    let config = AppConfig {
        reports_dir: not_a_dir,
        ..AppConfig::default()
    };
    let source = source_for(&config);
    let summary = fetch_summary(&*source, &config.dashboard.defaults);

    assert!(summary.from_fallback);
    assert_eq!(summary.total_potholes_detected, 120);
    assert_eq!(summary.total_reports_generated, 45);
    assert_eq!(summary.total_repairs_completed, 30);
    assert!(summary.volume_totals.is_empty());
}

#[test]
fn maximal_counts_in_summary_file_still_chart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("summary.json");
    fs::write(&path, r#"{"potholesDetected": 18446744073709551615}"#).unwrap();

    let summary = fetch_summary(&JsonSummarySource::new(&path), &SummaryDefaults::default());
    assert_eq!(summary.total_potholes_detected, u64::MAX);
    assert!(!summary.from_fallback);

    let chart = proportion_chart(&summary);
    let sum: f64 = chart.slices.iter().map(|s| s.share).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}
