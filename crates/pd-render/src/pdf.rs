//! PDF export of a report table.
//!
//! The document is laid out first (title, header row and data rows split
//! across pages) and only then encoded, so the layout can be inspected
//! without parsing PDF bytes.

use std::path::{Path, PathBuf};

use pd_core::{CostModel, ReportName};
use pd_reports::PotholeRecord;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::info;

use crate::table::{ReportTable, render_table};
use crate::{RenderError, RenderResult};

pub const PDF_TITLE: &str = "Pothole Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const TABLE_TOP_MM: f32 = 20.0;
const ROW_HEIGHT_MM: f32 = 7.0;
const COLUMN_X_MM: [f32; 6] = [10.0, 40.0, 70.0, 100.0, 135.0, 170.0];

/// Data rows that fit below the header row on one A4 page.
pub const ROWS_PER_PAGE: usize = 36;

#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    pub rows: Vec<[String; 6]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub title: String,
    pub headers: [String; 6],
    pub pages: Vec<PdfPage>,
}

impl PdfLayout {
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String; 6]> {
        self.pages.iter().flat_map(|p| p.rows.iter())
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub file_name: String,
    pub layout: PdfLayout,
    pub bytes: Vec<u8>,
}

impl RenderedPdf {
    /// Write the document into `dir` under its report-derived file name.
    pub fn save_to(&self, dir: &Path) -> RenderResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), rows = self.layout.row_count(), "saved PDF report");
        Ok(path)
    }
}

/// Split a table into pages. The header row is repeated on every page.
pub fn layout_pdf(table: &ReportTable) -> PdfLayout {
    let headers: [String; 6] = std::array::from_fn(|i| {
        table.headers.get(i).cloned().unwrap_or_default()
    });

    let rows: Vec<[String; 6]> = table
        .rows
        .iter()
        .map(|row| row.cells().map(str::to_string))
        .collect();

    let pages = rows
        .chunks(ROWS_PER_PAGE)
        .map(|chunk| PdfPage {
            rows: chunk.to_vec(),
        })
        .collect();

    PdfLayout {
        title: PDF_TITLE.to_string(),
        headers,
        pages,
    }
}

/// Render a loaded report to a PDF document.
pub fn render_pdf(
    name: &ReportName,
    records: &[PotholeRecord],
    costs: &dyn CostModel,
) -> RenderResult<RenderedPdf> {
    if records.is_empty() {
        return Err(RenderError::EmptyReport {
            name: name.to_string(),
        });
    }

    let layout = layout_pdf(&render_table(records, costs));
    let bytes = encode(&layout)?;

    Ok(RenderedPdf {
        file_name: name.pdf_file_name(),
        layout,
        bytes,
    })
}

fn encode(layout: &PdfLayout) -> RenderResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Table",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..layout.pages.len() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Table");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    layers[0].use_text(
        layout.title.as_str(),
        TITLE_SIZE,
        Mm(MARGIN_MM),
        Mm(PAGE_HEIGHT_MM - MARGIN_MM),
        &bold,
    );

    for (page, layer) in layout.pages.iter().zip(&layers) {
        let mut y = PAGE_HEIGHT_MM - TABLE_TOP_MM;
        write_row(layer, &layout.headers, y, &bold);
        for row in &page.rows {
            y -= ROW_HEIGHT_MM;
            write_row(layer, row, y, &regular);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn write_row(layer: &PdfLayerReference, cells: &[String; 6], y: f32, font: &IndirectFontRef) {
    for (cell, x) in cells.iter().zip(COLUMN_X_MM) {
        layer.use_text(cell.as_str(), BODY_SIZE, Mm(x), Mm(y), font);
    }
}
