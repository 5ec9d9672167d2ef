//! # Invoice Layout Engine
//!
//! Turns an [`Invoice`] and a [`CompanyProfile`] into draw calls on a
//! [`DrawingSurface`], top to bottom in one pass:
//!
//! ```text
//!   header        logo, INVOICE title, invoice id
//!   party block   INVOICE TO | FROM          (two column cursors, reconciled)
//!   metadata      dark bar + dates + status pill
//!   line items    dark header + up to MAX_TABLE_ROWS rows
//!   totals        right-aligned block + TOTAL box
//!   notes         tinted box, or a small gap
//!   footer        pinned to the page bottom, not to the cursor
//! ```
//!
//! Every section takes the [`Cursor`] it starts at and returns the cursor
//! the next section starts at, so each section's height can be checked in
//! isolation.
//!
//! Two behaviors are policy, not accident:
//! - At most [`MAX_TABLE_ROWS`] line items are drawn; the rest are dropped
//!   without error. There is no second page.
//! - The logo is best-effort ([`LOGO_IS_BEST_EFFORT`]): if it can't be
//!   loaded the page renders without it.

pub mod cursor;
pub mod format;

pub use cursor::{reconcile_columns, Column, Cursor, PageGeometry};

use std::borrow::Cow;

use tracing::{debug, info_span, warn};

use crate::font::{FontContext, FontKey};
use crate::model::{present, CompanyProfile, Invoice};
use crate::style::palette;
use crate::surface::{DrawingSurface, Rect, TextOptions};
use crate::text::break_into_lines;

/// Line items beyond this many are not drawn.
pub const MAX_TABLE_ROWS: usize = 12;

/// A logo that fails to load is logged and skipped; it never fails the
/// render.
pub const LOGO_IS_BEST_EFFORT: bool = true;

// ── Page ────────────────────────────────────────────────────────
pub const PAGE_MARGIN: f64 = 30.0;
pub const HEADER_TOP: f64 = 20.0;

// ── Type sizes ──────────────────────────────────────────────────
pub const TITLE_SIZE: f64 = 36.0;
pub const SMALL_TEXT: f64 = 9.0;
pub const NORMAL_TEXT: f64 = 10.0;
pub const TOTAL_TEXT: f64 = 11.0;

// ── Header ──────────────────────────────────────────────────────
pub const LOGO_SIZE: f64 = 64.0;
pub const TITLE_GAP: f64 = 6.0;
pub const INVOICE_ID_GAP: f64 = 18.0;

// ── Party block ─────────────────────────────────────────────────
pub const COLUMN_GUTTER: f64 = 40.0;
pub const PARTY_HEADER_HEIGHT: f64 = 14.0;
pub const PARTY_LINE_HEIGHT: f64 = 12.0;
pub const PARTY_GAP: f64 = 12.0;

// ── Metadata strip ──────────────────────────────────────────────
pub const STRIP_HEADER_HEIGHT: f64 = 24.0;
pub const STRIP_ROW_HEIGHT: f64 = 20.0;
pub const STRIP_GAP: f64 = 8.0;
pub const STATUS_OFFSET_FROM_RIGHT: f64 = 78.0;
pub const PILL_WIDTH: f64 = 60.0;
pub const PILL_HEIGHT: f64 = 16.0;
pub const PILL_RADIUS: f64 = 3.0;

// ── Line-item table ─────────────────────────────────────────────
pub const TABLE_TOP_GAP: f64 = 4.0;
pub const TABLE_HEADER_HEIGHT: f64 = 24.0;
pub const TABLE_HEADER_GAP: f64 = 6.0;
pub const TABLE_ROW_HEIGHT: f64 = 20.0;
pub const TABLE_GAP: f64 = 12.0;
const PRICE_COLUMN: f64 = 0.45;
const QTY_COLUMN: f64 = 0.65;
const TOTAL_COLUMN: f64 = 0.82;

// ── Totals ──────────────────────────────────────────────────────
pub const TOTALS_WIDTH: f64 = 160.0;
pub const TOTALS_ROW_HEIGHT: f64 = 16.0;
pub const TOTALS_VALUE_OFFSET: f64 = 60.0;
pub const TOTAL_BOX_HEIGHT: f64 = 26.0;
pub const TOTALS_GAP: f64 = 12.0;

// ── Notes ───────────────────────────────────────────────────────
pub const NOTES_TOP_GAP: f64 = 8.0;
pub const NOTES_HEIGHT: f64 = 48.0;
pub const NOTES_RADIUS: f64 = 4.0;
pub const NOTES_BODY_OFFSET: f64 = 22.0;
pub const NOTES_LINE_HEIGHT: f64 = 10.8;
pub const NOTES_GAP: f64 = 12.0;
pub const NO_NOTES_GAP: f64 = 18.0;

// ── Footer ──────────────────────────────────────────────────────
pub const FOOTER_FROM_BOTTOM: f64 = 90.0;
pub const FOOTER_TEXT: &str = "Thank You For Your Business";

/// What the engine decided while laying out one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSummary {
    pub logo_drawn: bool,
    /// Cursor y where single-column flow resumed after the party block.
    pub party_block_bottom: f64,
    pub rows_rendered: usize,
    /// Line items dropped by the [`MAX_TABLE_ROWS`] cap.
    pub rows_truncated: usize,
    /// Header bar plus rendered rows.
    pub table_height: f64,
    pub discount_row: bool,
    pub notes_rendered: bool,
    /// Wrapped notes lines drawn.
    pub notes_lines: usize,
    /// Wrapped notes lines that would have crossed the footer divider.
    pub notes_lines_dropped: usize,
    /// Cursor y after the notes block.
    pub content_bottom: f64,
    pub footer_y: f64,
}

/// X positions of the four table columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableColumns {
    pub product_x: f64,
    pub price_x: f64,
    pub qty_x: f64,
    pub total_x: f64,
    right: f64,
}

impl TableColumns {
    pub fn new(left: f64, width: f64) -> Self {
        Self {
            product_x: left + 10.0,
            price_x: left + (width * PRICE_COLUMN).round(),
            qty_x: left + (width * QTY_COLUMN).round(),
            total_x: left + (width * TOTAL_COLUMN).round(),
            right: left + width,
        }
    }

    pub fn product_width(&self) -> f64 {
        self.price_x - self.product_x - 10.0
    }

    pub fn price_width(&self) -> f64 {
        self.qty_x - self.price_x - 5.0
    }

    pub fn qty_width(&self) -> f64 {
        self.total_x - self.qty_x - 5.0
    }

    pub fn total_width(&self) -> f64 {
        self.right - self.total_x - 10.0
    }
}

/// Lay out one invoice page on `surface`.
pub fn render<S: DrawingSurface>(
    surface: &mut S,
    invoice: &Invoice,
    company: &CompanyProfile,
) -> LayoutSummary {
    let (width, height) = surface.page_size();
    let geometry = PageGeometry::new(width, height, PAGE_MARGIN);
    InvoiceLayout::new(invoice, company, geometry).render(surface)
}

/// Section renderers for one invoice.
pub struct InvoiceLayout<'a> {
    invoice: &'a Invoice,
    company: &'a CompanyProfile,
    geometry: PageGeometry,
    font_context: FontContext,
}

impl<'a> InvoiceLayout<'a> {
    pub fn new(invoice: &'a Invoice, company: &'a CompanyProfile, geometry: PageGeometry) -> Self {
        Self {
            invoice,
            company,
            geometry,
            font_context: FontContext::new(),
        }
    }

    /// All sections in page order.
    pub fn render<S: DrawingSurface>(&self, s: &mut S) -> LayoutSummary {
        let span = info_span!("render", invoice = %self.invoice.invoice_number);
        let _guard = span.enter();

        let mut summary = LayoutSummary::default();

        let cursor = self.geometry.cursor_at(HEADER_TOP);
        let cursor = self.header(s, cursor, &mut summary);
        debug!(y = cursor.y, "header done");

        let cursor = self.party_block(s, cursor);
        summary.party_block_bottom = cursor.y;
        debug!(y = cursor.y, "party block done");

        let cursor = self.metadata_strip(s, cursor);
        debug!(y = cursor.y, "metadata strip done");

        let cursor = self.line_items(s, cursor, &mut summary);
        debug!(y = cursor.y, rows = summary.rows_rendered, "line items done");

        let cursor = self.totals(s, cursor, &mut summary);
        debug!(y = cursor.y, "totals done");

        let cursor = self.notes(s, cursor, &mut summary);
        summary.content_bottom = cursor.y;

        summary.footer_y = self.footer(s);
        if summary.content_bottom > summary.footer_y {
            warn!(
                content_bottom = summary.content_bottom,
                footer_y = summary.footer_y,
                "content runs into the footer"
            );
        }

        summary
    }

    /// Logo, title and invoice id.
    pub fn header<S: DrawingSurface>(
        &self,
        s: &mut S,
        cursor: Cursor,
        summary: &mut LayoutSummary,
    ) -> Cursor {
        if let Some(logo) = present(&self.company.logo) {
            let rect = Rect::new(cursor.left, cursor.y, LOGO_SIZE, LOGO_SIZE);
            match s.draw_image(logo, rect) {
                Ok(()) => summary.logo_drawn = true,
                Err(err) => warn!(error = %err, "logo could not be loaded; rendering without it"),
            }
        }

        s.set_font(FontKey::helvetica_bold(), TITLE_SIZE);
        s.set_fill_color(palette::ink());
        s.draw_text("INVOICE", cursor.left, cursor.y, TextOptions::default());
        let cursor = cursor.advance(TITLE_SIZE + TITLE_GAP);

        s.set_font(FontKey::helvetica(), SMALL_TEXT);
        s.set_fill_color(palette::muted());
        let id_line = format!("Invoice ID: {}", self.invoice.invoice_number);
        s.draw_text(&id_line, cursor.left, cursor.y, TextOptions::default());
        cursor.advance(INVOICE_ID_GAP)
    }

    /// INVOICE TO (client) beside FROM (company).
    pub fn party_block<S: DrawingSurface>(&self, s: &mut S, cursor: Cursor) -> Cursor {
        let (left_col, right_col) = cursor.split_columns(COLUMN_GUTTER);
        let client = &self.invoice.client;
        let company = self.company;

        let left_y = self.party_column(
            s,
            left_col,
            cursor.y,
            "INVOICE TO",
            &client.name,
            [&client.email, &client.phone, &client.address],
        );
        let right_y = self.party_column(
            s,
            right_col,
            cursor.y,
            "FROM",
            present(&company.business_name).unwrap_or(""),
            [&company.email, &company.phone, &company.address],
        );

        cursor.at(reconcile_columns(left_y, right_y, PARTY_GAP))
    }

    /// One party column. Returns the y below its last line. Absent fields
    /// take no space.
    fn party_column<S: DrawingSurface>(
        &self,
        s: &mut S,
        col: Column,
        top: f64,
        heading: &str,
        name: &str,
        optional: [&Option<String>; 3],
    ) -> f64 {
        s.set_font(FontKey::helvetica_bold(), NORMAL_TEXT);
        s.set_fill_color(palette::ink());
        s.draw_text(heading, col.x, top, TextOptions::default());

        let key = FontKey::helvetica();
        s.set_font(key.clone(), SMALL_TEXT);
        let mut y = top + PARTY_HEADER_HEIGHT;
        let lines = std::iter::once(name).chain(optional.into_iter().filter_map(present));
        for line in lines {
            let line = single_line(line);
            let clipped = self
                .font_context
                .clip_to_width(&line, &key, SMALL_TEXT, col.width);
            s.draw_text(clipped, col.x, y, TextOptions::width(col.width));
            y += PARTY_LINE_HEIGHT;
        }
        y
    }

    /// Dark header bar with dates and status, then the data row.
    pub fn metadata_strip<S: DrawingSurface>(&self, s: &mut S, cursor: Cursor) -> Cursor {
        let (left_col, right_col) = cursor.split_columns(COLUMN_GUTTER);
        let top = cursor.y;
        let status_x = cursor.right - STATUS_OFFSET_FROM_RIGHT;

        s.set_fill_color(palette::ink());
        s.fill_rect(Rect::new(cursor.left, top, cursor.width(), STRIP_HEADER_HEIGHT));
        s.set_fill_color(palette::on_dark());
        s.set_font(FontKey::helvetica_bold(), NORMAL_TEXT);
        s.draw_text("Invoice Date", left_col.x + 10.0, top + 6.0, TextOptions::default());
        s.draw_text("Due Date", right_col.x + 10.0, top + 6.0, TextOptions::default());
        s.draw_text("Status", status_x, top + 6.0, TextOptions::default());

        let row = top + STRIP_HEADER_HEIGHT;
        s.set_font(FontKey::helvetica(), SMALL_TEXT);
        s.set_fill_color(palette::ink());
        let invoice_date = format::date(self.invoice.invoice_date);
        let due_date = format::date(self.invoice.due_date);
        s.draw_text(&invoice_date, left_col.x + 10.0, row + 4.0, TextOptions::default());
        s.draw_text(&due_date, right_col.x + 10.0, row + 4.0, TextOptions::default());

        let status = &self.invoice.status;
        s.set_fill_color(format::status_color(status));
        s.fill_rounded_rect(
            Rect::new(status_x, row + 2.0, PILL_WIDTH, PILL_HEIGHT),
            PILL_RADIUS,
        );
        let bold = FontKey::helvetica_bold();
        let label = self
            .font_context
            .clip_to_width(status.as_str(), &bold, SMALL_TEXT, PILL_WIDTH - 12.0);
        s.set_fill_color(palette::on_dark());
        s.set_font(bold, SMALL_TEXT);
        s.draw_text(label, status_x + 6.0, row + 4.0, TextOptions::default());

        let divider_y = row + STRIP_ROW_HEIGHT - 4.0;
        s.set_stroke_color(palette::border());
        s.stroke_line(cursor.left + 2.0, divider_y, cursor.right - 2.0, divider_y);

        cursor.at(row + STRIP_ROW_HEIGHT + STRIP_GAP)
    }

    /// Column header bar and up to [`MAX_TABLE_ROWS`] item rows.
    pub fn line_items<S: DrawingSurface>(
        &self,
        s: &mut S,
        cursor: Cursor,
        summary: &mut LayoutSummary,
    ) -> Cursor {
        let table_top = cursor.y + TABLE_TOP_GAP;
        let left = cursor.left;
        let cols = TableColumns::new(left, cursor.width());

        s.set_fill_color(palette::ink());
        s.fill_rect(Rect::new(left, table_top, cursor.width(), TABLE_HEADER_HEIGHT));
        s.set_fill_color(palette::on_dark());
        s.set_font(FontKey::helvetica_bold(), NORMAL_TEXT);
        let label_y = table_top + 6.0;
        s.draw_text("PRODUCT", cols.product_x, label_y, TextOptions::default());
        s.draw_text("PRICE", cols.price_x, label_y, TextOptions::right(cols.price_width()));
        s.draw_text("QTY", cols.qty_x, label_y, TextOptions::right(cols.qty_width()));
        s.draw_text("TOTAL", cols.total_x, label_y, TextOptions::right(cols.total_width()));

        let rows_top = table_top + TABLE_HEADER_HEIGHT + TABLE_HEADER_GAP;
        let items = &self.invoice.items;
        let shown = items.len().min(MAX_TABLE_ROWS);
        if items.len() > shown {
            debug!(
                dropped = items.len() - shown,
                "line items beyond the table capacity are not drawn"
            );
        }

        let regular = FontKey::helvetica();
        s.set_stroke_color(palette::border());
        for (idx, item) in items.iter().take(shown).enumerate() {
            let row_y = rows_top + idx as f64 * TABLE_ROW_HEIGHT;

            s.set_font(regular.clone(), SMALL_TEXT);
            s.set_fill_color(palette::ink());
            let name = single_line(&item.name);
            let name = self.font_context.clip_to_width(
                &name,
                &regular,
                SMALL_TEXT,
                cols.product_width(),
            );
            s.draw_text(name, cols.product_x, row_y, TextOptions::width(cols.product_width()));
            s.draw_text(
                &format::currency(item.price),
                cols.price_x,
                row_y,
                TextOptions::right(cols.price_width()),
            );
            s.draw_text(
                &format::quantity(item.quantity),
                cols.qty_x,
                row_y,
                TextOptions::right(cols.qty_width()),
            );

            s.set_font(FontKey::helvetica_bold(), SMALL_TEXT);
            s.draw_text(
                &format::currency(item.line_total()),
                cols.total_x,
                row_y,
                TextOptions::right(cols.total_width()),
            );

            let sep_y = row_y + TABLE_ROW_HEIGHT - 4.0;
            s.stroke_line(left + 2.0, sep_y, cursor.right - 2.0, sep_y);
        }

        let rows_height = shown as f64 * TABLE_ROW_HEIGHT;
        summary.rows_rendered = shown;
        summary.rows_truncated = items.len() - shown;
        summary.table_height = TABLE_HEADER_HEIGHT + rows_height;

        cursor.at(rows_top + rows_height + TABLE_GAP)
    }

    /// SUB-TOTAL, TAX, optional DISCOUNT, then the TOTAL box.
    pub fn totals<S: DrawingSurface>(
        &self,
        s: &mut S,
        cursor: Cursor,
        summary: &mut LayoutSummary,
    ) -> Cursor {
        let invoice = self.invoice;
        let x = cursor.right - TOTALS_WIDTH;
        let mut y = cursor.y;

        let tax = format::currency(invoice.tax);
        let mut rows = vec![
            ("SUB-TOTAL".to_string(), format::currency(invoice.subtotal)),
            // The tax amount appears in both the label and the value.
            (format!("TAX ({})", tax), tax),
        ];
        summary.discount_row = invoice.discount != 0.0;
        if summary.discount_row {
            rows.push((
                "DISCOUNT".to_string(),
                format::negative_currency(invoice.discount),
            ));
        }

        let column_width = TOTALS_WIDTH - TOTALS_VALUE_OFFSET;
        for (label, value) in &rows {
            s.set_font(FontKey::helvetica(), SMALL_TEXT);
            s.set_fill_color(palette::muted());
            s.draw_text(label, x, y, TextOptions::width(column_width));
            s.set_fill_color(palette::ink());
            s.draw_text(
                value,
                x + TOTALS_VALUE_OFFSET,
                y,
                TextOptions::right(column_width),
            );
            y += TOTALS_ROW_HEIGHT;
        }

        s.set_stroke_color(palette::border());
        s.stroke_line(x, y, cursor.right, y);
        y += 8.0;

        s.set_fill_color(palette::ink());
        s.fill_rect(Rect::new(x, y, TOTALS_WIDTH, TOTAL_BOX_HEIGHT));
        s.set_fill_color(palette::on_dark());
        s.set_font(FontKey::helvetica_bold(), TOTAL_TEXT);
        s.draw_text("TOTAL", x + 8.0, y + 6.0, TextOptions::default());
        s.draw_text(
            &format::currency(invoice.total),
            x + TOTALS_VALUE_OFFSET,
            y + 6.0,
            TextOptions::right(column_width),
        );

        cursor.at(y + TOTAL_BOX_HEIGHT + TOTALS_GAP)
    }

    /// The notes box if there are notes, otherwise a fixed gap.
    pub fn notes<S: DrawingSurface>(
        &self,
        s: &mut S,
        cursor: Cursor,
        summary: &mut LayoutSummary,
    ) -> Cursor {
        let Some(text) = self.invoice.notes_text() else {
            return cursor.advance(NO_NOTES_GAP);
        };

        let top = cursor.y + NOTES_TOP_GAP;
        let inner_x = cursor.left + 8.0;
        let inner_width = cursor.width() - 16.0;

        s.set_fill_color(palette::notes_background());
        s.fill_rounded_rect(
            Rect::new(cursor.left, top, cursor.width(), NOTES_HEIGHT),
            NOTES_RADIUS,
        );
        s.set_fill_color(palette::ink());
        s.set_font(FontKey::helvetica_bold(), NORMAL_TEXT);
        s.draw_text("NOTES", inner_x, top + 6.0, TextOptions::default());

        let body = FontKey::helvetica();
        let lines = break_into_lines(&self.font_context, text, inner_width, &body, SMALL_TEXT);

        // The body may run past the box; it stops only at the footer divider.
        let first = top + NOTES_BODY_OFFSET;
        let last = self.footer_y() - NOTES_LINE_HEIGHT;
        let fits = if last < first {
            0
        } else {
            ((last - first) / NOTES_LINE_HEIGHT).floor() as usize + 1
        };
        let shown = lines.len().min(fits);
        if shown < lines.len() {
            warn!(
                lines = lines.len(),
                shown, "notes run into the footer; remaining lines are not drawn"
            );
        }

        s.set_font(body, SMALL_TEXT);
        s.set_fill_color(palette::soft_ink());
        for (idx, line) in lines.iter().take(shown).enumerate() {
            let y = first + idx as f64 * NOTES_LINE_HEIGHT;
            s.draw_text(line, inner_x, y, TextOptions::width(inner_width));
        }

        summary.notes_lines = shown;
        summary.notes_lines_dropped = lines.len() - shown;
        summary.notes_rendered = true;
        cursor.at(top + NOTES_HEIGHT + NOTES_GAP)
    }

    fn footer_y(&self) -> f64 {
        self.geometry.height - FOOTER_FROM_BOTTOM
    }

    /// Divider and closing line at a fixed distance from the page bottom.
    /// Returns the divider y.
    pub fn footer<S: DrawingSurface>(&self, s: &mut S) -> f64 {
        let g = self.geometry;
        let footer_y = self.footer_y();

        s.set_stroke_color(palette::border());
        s.stroke_line(g.left(), footer_y, g.right(), footer_y);

        s.set_font(FontKey::helvetica_oblique(), NORMAL_TEXT);
        s.set_fill_color(palette::soft_ink());
        s.draw_text(
            FOOTER_TEXT,
            g.left(),
            footer_y + 10.0,
            TextOptions::center(g.content_width()),
        );

        footer_y
    }
}

/// Join the lines of a multi-line field with `", "` so it fits a
/// one-line slot.
fn single_line(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r']) {
        return Cow::Borrowed(text);
    }
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    Cow::Owned(joined)
}
