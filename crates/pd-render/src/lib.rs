//! pd-render: tabular and PDF rendering of loaded reports.

pub mod pdf;
pub mod table;

pub use pdf::{PDF_TITLE, PdfLayout, PdfPage, RenderedPdf, layout_pdf, render_pdf};
pub use table::{ReportRow, ReportTable, TABLE_HEADERS, render_table};

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("No data available to generate the report: {name}")]
    EmptyReport { name: String },

    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
