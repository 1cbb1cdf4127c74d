use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestEnv {
    tmp: TempDir,
    config: PathBuf,
}

impl TestEnv {
    fn new(extra_yaml: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let reports = tmp.path().join("csv");
        fs::create_dir_all(&reports).expect("create reports dir");

        let config = tmp.path().join("desk.yaml");
        let yaml = format!(
            "reports_dir: {}\nuploads_dir: {}\n{}",
            reports.display(),
            tmp.path().join("uploads").display(),
            extra_yaml
        );
        fs::write(&config, yaml).expect("write config");
        Self { tmp, config }
    }

    fn reports_dir(&self) -> PathBuf {
        self.tmp.path().join("csv")
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pd-cli").expect("binary built");
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

#[test]
fn lists_reports() {
    let env = TestEnv::new("");
    fs::write(env.reports_dir().join("b.csv"), "h\n").unwrap();
    fs::write(env.reports_dir().join("a.csv"), "h\n").unwrap();

    let out = env.run_json(&["reports", "list"]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"], serde_json::json!(["a.csv", "b.csv"]));
}

#[test]
fn shows_report_table() {
    let env = TestEnv::new("");
    fs::write(
        env.reports_dir().join("ward.csv"),
        "id,volume,depth,timestamp\n1,0.12345,0.0789,2024-01-01\n",
    )
    .unwrap();

    env.cmd()
        .args(["reports", "show", "ward.csv"])
        .assert()
        .success()
        .stdout(contains("0.123"))
        .stdout(contains("Total Cost (INR)"))
        .stderr(contains("Report data loaded."));
}

#[test]
fn missing_report_fails_with_one_notice() {
    let env = TestEnv::new("");
    env.cmd()
        .args(["reports", "show", "nope.csv"])
        .assert()
        .code(1)
        .stderr(contains("Failed to load report data"));
}

#[test]
fn exports_pdf_next_to_output_dir() {
    let env = TestEnv::new("");
    fs::write(env.reports_dir().join("ward.csv"), "h\n1,0.5,0.1,t\n").unwrap();
    let out_dir = env.path().join("pdf");

    env.cmd()
        .args(["reports", "pdf", "ward.csv", "--output"])
        .arg(&out_dir)
        .assert()
        .success()
        .stderr(contains("PDF generated successfully!"));

    let bytes = fs::read(out_dir.join("ward_report.pdf")).expect("pdf written");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn summary_falls_back_when_summary_file_is_missing() {
    let env = TestEnv::new("dashboard:\n  summary_file: /nonexistent/summary.json\n");

    let out = env.run_json(&["summary"]);
    let summary = &out["data"]["summary"];
    assert_eq!(summary["totalPotholesDetected"], 120);
    assert_eq!(summary["totalReportsGenerated"], 45);
    assert_eq!(summary["totalRepairsCompleted"], 30);
    assert_eq!(summary["volumeTotals"], serde_json::json!([]));
    assert_eq!(out["data"]["chart"]["slices"][0]["color"], "#f87171");
}

#[test]
fn detect_without_video_is_rejected() {
    let env = TestEnv::new("engine:\n  command:\n    program: /nonexistent/engine\n");
    env.cmd()
        .arg("detect")
        .assert()
        .code(2)
        .stderr(contains("Please select a video to submit."));
}
