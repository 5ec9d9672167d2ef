//! # Folio
//!
//! A fixed-page invoice layout engine.
//!
//! An invoice is always exactly one page. There's no pagination, no flex, no
//! measurement pass: every section knows its own height, and the layout is a
//! single top-to-bottom walk with a cursor. Content that wouldn't fit (more
//! than [`layout::MAX_TABLE_ROWS`] line items) is dropped, not paginated.
//!
//! ## Architecture
//!
//! ```text
//! Invoice JSON + Company JSON
//!       ↓
//!   [model]    — Invoice, LineItem, Client, CompanyProfile
//!       ↓
//!   [layout]   — Cursor geometry + section renderers
//!       ↓  draw calls
//!   [surface]  — DrawingSurface trait, RecordingSurface
//!       ↓
//!   [pdf]      — PdfSurface: content stream + objects + xref
//! ```

pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod surface;
pub mod text;

pub use error::FolioError;
pub use layout::LayoutSummary;

use model::{CompanyProfile, Invoice, PageSize};
use pdf::PdfSurface;
use surface::DrawingSurface;

/// MIME type of the rendered document.
pub const CONTENT_TYPE: &str = "application/pdf";

/// Render an invoice to the bytes of a one-page A4 PDF.
pub fn render(invoice: &Invoice, company: &CompanyProfile) -> Result<Vec<u8>, FolioError> {
    let surface = PdfSurface::new(PageSize::A4)
        .with_title(format!("Invoice {}", invoice.invoice_number));
    let (bytes, _) = render_to(surface, invoice, company)?;
    Ok(bytes)
}

/// Lay out an invoice on any surface and finish it.
pub fn render_to<S: DrawingSurface>(
    mut surface: S,
    invoice: &Invoice,
    company: &CompanyProfile,
) -> Result<(S::Output, LayoutSummary), FolioError> {
    let summary = layout::render(&mut surface, invoice, company);
    let output = surface.finish()?;
    Ok((output, summary))
}

/// Render from JSON records. A missing company profile renders with an
/// empty FROM column.
pub fn render_json(invoice_json: &str, company_json: Option<&str>) -> Result<Vec<u8>, FolioError> {
    let invoice: Invoice = serde_json::from_str(invoice_json)?;
    let company: CompanyProfile = match company_json {
        Some(json) => serde_json::from_str(json)?,
        None => CompanyProfile::default(),
    };
    render(&invoice, &company)
}

/// Download name for a rendered invoice: `invoice-<number>.pdf`.
pub fn attachment_filename(invoice: &Invoice) -> String {
    format!("invoice-{}.pdf", invoice.invoice_number)
}
