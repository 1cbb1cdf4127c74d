//! On-screen report table.

use pd_core::{CostModel, fixed};
use pd_reports::PotholeRecord;
use serde::Serialize;

pub const TABLE_HEADERS: [&str; 6] = [
    "ID",
    "Volume (m3)",
    "Depth (m)",
    "Cement Cost",
    "Concrete Cost",
    "Total Cost",
];

const VOLUME_PLACES: usize = 3;
const DEPTH_PLACES: usize = 2;
const COST_PLACES: usize = 2;

/// One formatted table row. All cells are display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub volume: String,
    pub depth: String,
    pub cement_cost: String,
    pub concrete_cost: String,
    pub total_cost: String,
}

impl ReportRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.id,
            &self.volume,
            &self.depth,
            &self.cement_cost,
            &self.concrete_cost,
            &self.total_cost,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

/// Format every record with its cost, one row per record.
pub fn render_table(records: &[PotholeRecord], costs: &dyn CostModel) -> ReportTable {
    let rows = records
        .iter()
        .map(|record| {
            let cost = costs.cost(record.volume());
            ReportRow {
                id: record.id.clone(),
                volume: fixed(record.volume, VOLUME_PLACES),
                depth: fixed(record.depth, DEPTH_PLACES),
                cement_cost: fixed(cost.cement_cost, COST_PLACES),
                concrete_cost: fixed(cost.concrete_cost, COST_PLACES),
                total_cost: fixed(cost.total_cost, COST_PLACES),
            }
        })
        .collect();

    ReportTable {
        headers: TABLE_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

impl ReportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Label the cost columns with a currency, e.g. `Total Cost (INR)`.
    pub fn with_currency(mut self, currency: &str) -> Self {
        if currency.is_empty() {
            return self;
        }
        for header in self.headers.iter_mut().skip(3) {
            *header = format!("{header} ({currency})");
        }
        self
    }

    /// Aligned plain-text rendering: header, rule, then rows.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row.cells()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, self.headers.iter().map(String::as_str), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, rule.iter().map(String::as_str), &widths);
        for row in &self.rows {
            push_line(&mut out, row.cells().into_iter(), &widths);
        }
        out
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
