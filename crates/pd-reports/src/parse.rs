//! Row parsing for report files.
//!
//! The first line is always a header and is never turned into a record.
//! Blank lines are skipped. Rows are split on `,` with no quoting rules.

use pd_core::{cm, in_m};

use crate::types::PotholeRecord;
use crate::{ReportsError, ReportsResult};

/// Header written by the detection engine for its own report files.
pub const ENGINE_HEADER: [&str; 6] = [
    "Pothole ID",
    "Length (cm)",
    "Breadth (cm)",
    "Volume (m^3)",
    "Depth (cm)",
    "Timestamp",
];

/// Column arrangement of a report file, decided by its header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// `id,volume,depth,timestamp` with volume in m³ and depth in m.
    Compact,
    /// The engine's six-column layout; depth is in centimeters.
    Engine,
}

impl CsvLayout {
    pub fn detect(header: &str) -> Self {
        let header = header.trim_start_matches('\u{feff}');
        let fields: Vec<&str> = header.split(',').map(str::trim).collect();
        if fields == ENGINE_HEADER {
            CsvLayout::Engine
        } else {
            CsvLayout::Compact
        }
    }

    pub fn field_count(self) -> usize {
        match self {
            CsvLayout::Compact => 4,
            CsvLayout::Engine => ENGINE_HEADER.len(),
        }
    }
}

/// Parse the full text of a report.
pub fn parse_report(report: &str, content: &str) -> ReportsResult<Vec<PotholeRecord>> {
    let mut lines = content.lines().enumerate();
    let layout = match lines.next() {
        Some((_, header)) => CsvLayout::detect(header),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_row(report, index + 1, line, layout)?);
    }
    Ok(records)
}

fn parse_row(
    report: &str,
    line_no: usize,
    line: &str,
    layout: CsvLayout,
) -> ReportsResult<PotholeRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != layout.field_count() {
        return Err(ReportsError::Parse {
            report: report.to_string(),
            line: line_no,
            expected: layout.field_count(),
            found: fields.len(),
        });
    }

    let record = match layout {
        CsvLayout::Compact => PotholeRecord {
            id: fields[0].to_string(),
            volume: parse_number(fields[1]),
            depth: parse_number(fields[2]),
            timestamp: fields[3].to_string(),
        },
        CsvLayout::Engine => PotholeRecord {
            id: fields[0].to_string(),
            volume: parse_number(fields[3]),
            depth: in_m(cm(parse_number(fields[4]))),
            timestamp: fields[5].to_string(),
        },
    };
    Ok(record)
}

fn parse_number(field: &str) -> f64 {
    field.parse::<f64>().unwrap_or(f64::NAN)
}
