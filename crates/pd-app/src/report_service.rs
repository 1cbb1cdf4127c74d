//! Report listing, loading, tabulation and PDF export.

use std::path::{Path, PathBuf};

use pd_core::{CostRates, ReportName};
use pd_render::{RenderedPdf, ReportTable, render_pdf, render_table};
use pd_reports::{PotholeRecord, ReportStore};
use tracing::info;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ReportService {
    store: ReportStore,
    rates: CostRates,
    currency: String,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ReportStore::new(config.reports_dir.clone()),
            rates: config.costs.rates(),
            currency: config.costs.currency.clone(),
        }
    }

    pub fn list_reports(&self) -> AppResult<Vec<String>> {
        Ok(self.store.list_reports()?)
    }

    pub fn load_report(&self, name: &str) -> AppResult<Vec<PotholeRecord>> {
        let records = self.store.load_report(name)?;
        info!(report = name, records = records.len(), "report loaded");
        Ok(records)
    }

    /// Load a report and format it for display.
    pub fn report_table(&self, name: &str) -> AppResult<ReportTable> {
        let records = self.load_report(name)?;
        Ok(render_table(&records, &self.rates).with_currency(&self.currency))
    }

    pub fn render_pdf(&self, name: &str) -> AppResult<RenderedPdf> {
        let report = ReportName::parse(name).map_err(|e| AppError::ReportNotFound(e.to_string()))?;
        let records = self.load_report(name)?;
        Ok(render_pdf(&report, &records, &self.rates)?)
    }

    /// Render a report to PDF and save it as `{report}_report.pdf` in `out_dir`.
    pub fn export_pdf(&self, name: &str, out_dir: &Path) -> AppResult<PathBuf> {
        let pdf = self.render_pdf(name)?;
        Ok(pdf.save_to(out_dir)?)
    }
}
