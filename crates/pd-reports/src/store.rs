//! Report storage API.
//!
//! Reports are written by the detection engine; this store only reads them.

use pd_core::ReportName;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::parse::parse_report;
use crate::types::{PotholeRecord, ReportStats, VolumeTotal};
use crate::{ReportsError, ReportsResult};

const REPORT_EXTENSION: &str = "csv";

#[derive(Clone, Debug)]
pub struct ReportStore {
    root_dir: PathBuf,
}

impl ReportStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn report_path(&self, name: &ReportName) -> PathBuf {
        self.root_dir.join(name.as_str())
    }

    /// Report file names, sorted. A missing directory holds no reports.
    pub fn list_reports(&self) -> ReportsResult<Vec<String>> {
        let mut names = Vec::new();

        if !self.root_dir.exists() {
            return Ok(names);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_report = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION));
            if is_report {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load one report. Names that could escape the reports directory are
    /// treated like any other missing report.
    pub fn load_report(&self, name: &str) -> ReportsResult<Vec<PotholeRecord>> {
        let not_found = || ReportsError::NotFound {
            name: name.to_string(),
        };
        let report = ReportName::parse(name).map_err(|_| not_found())?;
        let path = self.report_path(&report);

        if !path.is_file() {
            return Err(not_found());
        }

        debug!(path = %path.display(), "loading report");
        let content = fs::read_to_string(&path)?;
        parse_report(report.as_str(), &content)
    }

    /// Record count and summed volume of every readable report.
    ///
    /// Reports that fail to load are skipped with a warning. NaN volumes do
    /// not contribute to a total.
    pub fn scan(&self) -> ReportsResult<Vec<ReportStats>> {
        let mut stats = Vec::new();
        for name in self.list_reports()? {
            match self.load_report(&name) {
                Ok(records) => {
                    let total_volume = records
                        .iter()
                        .filter(|r| r.has_valid_volume())
                        .map(|r| r.volume)
                        .sum();
                    stats.push(ReportStats {
                        name,
                        record_count: records.len(),
                        total_volume,
                    });
                }
                Err(err) => warn!(report = %name, error = %err, "skipping unreadable report"),
            }
        }
        Ok(stats)
    }

    pub fn volume_totals(&self) -> ReportsResult<Vec<VolumeTotal>> {
        Ok(self.scan()?.iter().map(VolumeTotal::from).collect())
    }
}
