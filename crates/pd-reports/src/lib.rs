//! pd-reports: CSV report store and loader.

pub mod parse;
pub mod store;
pub mod types;

pub use parse::{CsvLayout, parse_report};
pub use store::ReportStore;
pub use types::*;

pub type ReportsResult<T> = Result<T, ReportsError>;

#[derive(thiserror::Error, Debug)]
pub enum ReportsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report not found: {name}")]
    NotFound { name: String },

    #[error("Malformed row in {report} at line {line}: expected {expected} fields, found {found}")]
    Parse {
        report: String,
        line: usize,
        expected: usize,
        found: usize,
    },
}
