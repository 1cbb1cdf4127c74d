//! Dashboard summary, proportion chart and per-report cost table.
//!
//! The summary never fails: when the upstream source is unavailable the
//! configured defaults are shown instead.

use std::path::PathBuf;

use pd_core::{CostModel, fixed, m3};
use pd_reports::{ReportStore, VolumeTotal};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Counts shown when the upstream source has nothing to say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryDefaults {
    pub potholes_detected: u64,
    pub reports_generated: u64,
    pub repairs_completed: u64,
}

impl SummaryDefaults {
    pub const POTHOLES_DETECTED: u64 = 120;
    pub const REPORTS_GENERATED: u64 = 45;
    pub const REPAIRS_COMPLETED: u64 = 30;
}

impl Default for SummaryDefaults {
    fn default() -> Self {
        Self {
            potholes_detected: Self::POTHOLES_DETECTED,
            reports_generated: Self::REPORTS_GENERATED,
            repairs_completed: Self::REPAIRS_COMPLETED,
        }
    }
}

/// Raw figures from a summary source. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamSummary {
    pub potholes_detected: Option<u64>,
    pub reports_generated: Option<u64>,
    pub repairs_completed: Option<u64>,
    pub volume_totals: Option<Vec<VolumeTotal>>,
}

pub trait SummarySource {
    fn fetch(&self) -> AppResult<UpstreamSummary>;
}

/// Derives the summary from the report files themselves.
///
/// Repairs are not tracked by the store, so that count always comes from
/// the defaults.
#[derive(Debug, Clone)]
pub struct StoreSummarySource {
    store: ReportStore,
}

impl StoreSummarySource {
    pub fn new(store: ReportStore) -> Self {
        Self { store }
    }
}

impl SummarySource for StoreSummarySource {
    fn fetch(&self) -> AppResult<UpstreamSummary> {
        let stats = self
            .store
            .scan()
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        Ok(UpstreamSummary {
            potholes_detected: Some(stats.iter().map(|s| s.record_count as u64).sum()),
            reports_generated: Some(stats.len() as u64),
            repairs_completed: None,
            volume_totals: Some(stats.iter().map(VolumeTotal::from).collect()),
        })
    }
}

/// Reads a JSON summary document:
/// `{"potholesDetected", "reportsGenerated", "repairsCompleted", "volumeTotals"}`.
#[derive(Debug, Clone)]
pub struct JsonSummarySource {
    path: PathBuf,
}

impl JsonSummarySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SummarySource for JsonSummarySource {
    fn fetch(&self) -> AppResult<UpstreamSummary> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::Upstream(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Upstream(format!("{}: {}", self.path.display(), e)))
    }
}

/// Summary source selected by the configuration.
pub fn source_for(config: &AppConfig) -> Box<dyn SummarySource> {
    match &config.dashboard.summary_file {
        Some(path) => Box::new(JsonSummarySource::new(path.clone())),
        None => Box::new(StoreSummarySource::new(ReportStore::new(
            config.reports_dir.clone(),
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_potholes_detected: u64,
    pub total_reports_generated: u64,
    pub total_repairs_completed: u64,
    pub volume_totals: Vec<VolumeTotal>,
    /// Set when the upstream source failed and every figure is a default.
    pub from_fallback: bool,
}

impl DashboardSummary {
    pub fn fallback(defaults: &SummaryDefaults) -> Self {
        Self {
            total_potholes_detected: defaults.potholes_detected,
            total_reports_generated: defaults.reports_generated,
            total_repairs_completed: defaults.repairs_completed,
            volume_totals: Vec::new(),
            from_fallback: true,
        }
    }
}

/// Fetch the dashboard summary, degrading to `defaults` instead of failing.
pub fn fetch_summary(source: &dyn SummarySource, defaults: &SummaryDefaults) -> DashboardSummary {
    match source.fetch() {
        Ok(upstream) => DashboardSummary {
            total_potholes_detected: upstream
                .potholes_detected
                .unwrap_or(defaults.potholes_detected),
            total_reports_generated: upstream
                .reports_generated
                .unwrap_or(defaults.reports_generated),
            total_repairs_completed: upstream
                .repairs_completed
                .unwrap_or(defaults.repairs_completed),
            volume_totals: upstream.volume_totals.unwrap_or_default(),
            from_fallback: false,
        },
        Err(err) => {
            warn!(error = %err, "dashboard summary unavailable, using defaults");
            DashboardSummary::fallback(defaults)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: &'static str,
    pub value: u64,
    /// Fraction of the chart total, 0 when the total is 0.
    pub share: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionChart {
    pub slices: [ChartSlice; 3],
}

pub fn proportion_chart(summary: &DashboardSummary) -> ProportionChart {
    let values = [
        ("Detected Potholes", summary.total_potholes_detected, "#f87171"),
        ("Reports Generated", summary.total_reports_generated, "#60a5fa"),
        ("Repairs Completed", summary.total_repairs_completed, "#34d399"),
    ];
    // Upstream counts are unbounded; summing in u64 could overflow.
    let total: f64 = values.iter().map(|(_, v, _)| *v as f64).sum();

    ProportionChart {
        slices: values.map(|(label, value, color)| ChartSlice {
            label,
            value,
            share: if total == 0.0 {
                0.0
            } else {
                value as f64 / total
            },
            color,
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRow {
    pub file_name: String,
    pub total_volume: String,
    pub cement_cost: String,
    pub concrete_cost: String,
    pub total_cost: String,
}

/// Cost of repairing every pothole in each report.
pub fn cost_table(summary: &DashboardSummary, costs: &dyn CostModel) -> Vec<CostRow> {
    summary
        .volume_totals
        .iter()
        .map(|vt| {
            let cost = costs.cost(m3(vt.total_volume));
            CostRow {
                file_name: vt.file_name.clone(),
                total_volume: fixed(vt.total_volume, 2),
                cement_cost: fixed(cost.cement_cost, 2),
                concrete_cost: fixed(cost.concrete_cost, 2),
                total_cost: fixed(cost.total_cost, 2),
            }
        })
        .collect()
}
