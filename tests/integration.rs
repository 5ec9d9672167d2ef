//! Integration tests for the Folio rendering pipeline.
//!
//! These drive the public API end to end. They verify:
//! - Invoice and company JSON deserialize as stored
//! - The display list carries the right rows, totals and colors
//! - The line-item table is capped and sized per row
//! - A broken logo never fails a render
//! - PDF output is structurally valid and deterministic

use std::io::Cursor as IoCursor;

use chrono::NaiveDate;
use proptest::prelude::*;

use folio::layout::{LayoutSummary, MAX_TABLE_ROWS, TABLE_HEADER_HEIGHT, TABLE_ROW_HEIGHT};
use folio::model::*;
use folio::pdf::PdfSurface;
use folio::style::{Color, TextAlign};
use folio::surface::{DrawOp, RecordingSurface};

// ─── Helpers ────────────────────────────────────────────────────

const A4: (f64, f64) = (595.28, 841.89);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_invoice(items: Vec<LineItem>) -> Invoice {
    let subtotal: f64 = items.iter().map(LineItem::line_total).sum();
    Invoice {
        invoice_number: "INV-2026-001".to_string(),
        invoice_date: date(2026, 2, 14),
        due_date: date(2026, 3, 1),
        status: InvoiceStatus::Pending,
        items,
        subtotal,
        tax: 0.0,
        discount: 0.0,
        total: subtotal,
        notes: None,
        client: Client {
            name: "Widget Industries".to_string(),
            ..Default::default()
        },
    }
}

fn make_items(n: usize) -> Vec<LineItem> {
    (0..n)
        .map(|i| LineItem::new(format!("Service {}", i + 1), 2.0, 25.0))
        .collect()
}

/// The two-item Paid invoice used across the scenario tests.
fn scenario_invoice() -> Invoice {
    let mut invoice = make_invoice(vec![
        LineItem::new("Web Design", 1.0, 1500.0),
        LineItem::new("Development", 40.0, 100.0),
    ]);
    invoice.status = InvoiceStatus::Paid;
    invoice.tax = 550.0;
    invoice.total = 6050.0;
    invoice
}

fn acme() -> CompanyProfile {
    CompanyProfile {
        business_name: Some("Acme Corp".to_string()),
        email: Some("billing@acme.test".to_string()),
        phone: Some("555-0100".to_string()),
        address: Some("123 Business St".to_string()),
        logo: None,
    }
}

fn record(invoice: &Invoice, company: &CompanyProfile) -> (Vec<DrawOp>, LayoutSummary) {
    folio::render_to(RecordingSurface::new(A4.0, A4.1), invoice, company).unwrap()
}

fn texts(ops: &[DrawOp]) -> Vec<&str> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

/// y of the first text op with this exact content.
fn text_y(ops: &[DrawOp], needle: &str) -> Option<f64> {
    ops.iter().find_map(|op| match op {
        DrawOp::Text { content, y, .. } if content == needle => Some(*y),
        _ => None,
    })
}

/// Fill color in effect when the first rounded rect was drawn.
fn first_pill_color(ops: &[DrawOp]) -> Option<Color> {
    let mut fill = None;
    for op in ops {
        match op {
            DrawOp::SetFillColor { color } => fill = Some(*color),
            DrawOp::RoundedRect { .. } => return fill,
            _ => {}
        }
    }
    None
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

fn contains(bytes: &[u8], needle: &[u8]) -> bool {
    bytes.windows(needle.len()).any(|w| w == needle)
}

fn png_data_uri() -> String {
    use base64::Engine;
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
    let mut buf = IoCursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageOutputFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
    )
}

// ─── Scenario ───────────────────────────────────────────────────

#[test]
fn test_paid_scenario_display_list() {
    let (ops, summary) = record(&scenario_invoice(), &acme());
    let t = texts(&ops);

    assert_eq!(summary.rows_rendered, 2);
    assert_eq!(summary.rows_truncated, 0);
    assert!(!summary.discount_row);

    assert!(t.contains(&"Web Design"));
    assert!(t.contains(&"Development"));
    assert!(t.contains(&"$1500.00"));
    assert!(t.contains(&"$4000.00"));
    assert!(t.contains(&"40"));
    assert!(t.contains(&"SUB-TOTAL"));
    assert!(t.contains(&"$5500.00"));
    assert!(t.contains(&"TAX ($550.00)"));
    assert!(t.contains(&"$550.00"));
    assert!(t.contains(&"$6050.00"));
    assert!(!t.contains(&"DISCOUNT"));
    assert!(t.contains(&"Paid"));
    assert_eq!(first_pill_color(&ops), Some(Color::hex("#22bb33")));
}

#[test]
fn test_amounts_are_right_aligned() {
    let (ops, _) = record(&scenario_invoice(), &acme());
    let total = ops.iter().find_map(|op| match op {
        DrawOp::Text {
            content, options, ..
        } if content == "$6050.00" => Some(*options),
        _ => None,
    });
    let options = total.unwrap();
    assert_eq!(options.align, TextAlign::Right);
    assert_eq!(options.width, Some(100.0));
}

#[test]
fn test_dates_and_header_text() {
    let (ops, _) = record(&scenario_invoice(), &acme());
    let t = texts(&ops);
    assert!(t.contains(&"INVOICE"));
    assert!(t.contains(&"Invoice ID: INV-2026-001"));
    assert!(t.contains(&"2/14/2026"));
    assert!(t.contains(&"3/1/2026"));
    assert!(t.contains(&"Acme Corp"));
    assert!(t.contains(&"123 Business St"));
}

// ─── Line-item table ────────────────────────────────────────────

#[test]
fn test_table_rows_up_to_capacity() {
    for n in 0..=MAX_TABLE_ROWS {
        let (ops, summary) = record(&make_invoice(make_items(n)), &acme());
        assert_eq!(summary.rows_rendered, n);
        assert_eq!(
            summary.table_height,
            TABLE_HEADER_HEIGHT + n as f64 * TABLE_ROW_HEIGHT
        );
        let names = texts(&ops)
            .into_iter()
            .filter(|s| s.starts_with("Service "))
            .count();
        assert_eq!(names, n);
    }
}

#[test]
fn test_thirteen_items_render_twelve() {
    let (_, twelve) = record(&make_invoice(make_items(12)), &acme());
    let (ops, thirteen) = record(&make_invoice(make_items(13)), &acme());
    assert_eq!(thirteen.rows_rendered, 12);
    assert_eq!(thirteen.rows_truncated, 1);
    assert_eq!(thirteen.table_height, twelve.table_height);
    let t = texts(&ops);
    assert!(t.contains(&"Service 12"));
    assert!(!t.contains(&"Service 13"));
}

#[test]
fn test_truncated_invoice_still_renders_pdf() {
    let bytes = folio::render(&make_invoice(make_items(40)), &acme()).unwrap();
    assert_valid_pdf(&bytes);
}

// ─── Totals ─────────────────────────────────────────────────────

#[test]
fn test_discount_row_when_nonzero() {
    let mut invoice = scenario_invoice();
    invoice.discount = 25.0;
    invoice.total = 6025.0;
    let (ops, summary) = record(&invoice, &acme());
    let t = texts(&ops);
    assert!(summary.discount_row);
    assert!(t.contains(&"DISCOUNT"));
    assert!(t.contains(&"-$25.00"));
    assert!(t.contains(&"$6025.00"));
    // The discount row pushes the TOTAL box down by one row.
    let (base_ops, _) = record(&scenario_invoice(), &acme());
    let with_box = text_y(&ops, "$6025.00").unwrap();
    let without_box = text_y(&base_ops, "$6050.00").unwrap();
    assert!((with_box - without_box - 16.0).abs() < 1e-9);
}

// ─── Parties ────────────────────────────────────────────────────

#[test]
fn test_client_without_contact_has_one_line() {
    let invoice = make_invoice(make_items(1));
    let (ops, _) = record(&invoice, &acme());
    let heading = text_y(&ops, "INVOICE TO").unwrap();
    let name = text_y(&ops, "Widget Industries").unwrap();
    assert!((name - heading - 14.0).abs() < 1e-9);

    // Nothing else is drawn in the left column between the name and the
    // metadata strip.
    let left_lines = ops
        .iter()
        .filter(|op| match op {
            DrawOp::Text { x, y, .. } => *x == 30.0 && *y > heading && *y < heading + 40.0,
            _ => false,
        })
        .count();
    assert_eq!(left_lines, 1);
}

#[test]
fn test_party_block_follows_deeper_column() {
    let invoice = make_invoice(vec![]);
    let (_, shallow) = record(&invoice, &CompanyProfile::default());
    let (_, deep) = record(&invoice, &acme());
    assert!((deep.party_block_bottom - shallow.party_block_bottom - 36.0).abs() < 1e-9);
}

#[test]
fn test_client_id_alias() {
    let json = r#"{
        "invoiceNumber": "INV-9",
        "invoiceDate": "2026-01-05",
        "dueDate": "2026-01-20",
        "clientId": { "name": "Globex", "email": "ap@globex.test" },
        "items": []
    }"#;
    let invoice: Invoice = serde_json::from_str(json).unwrap();
    assert_eq!(invoice.client.name, "Globex");
    assert_eq!(invoice.status, InvoiceStatus::Pending);
}

// ─── Status ─────────────────────────────────────────────────────

#[test]
fn test_status_pill_colors() {
    let cases = [
        (InvoiceStatus::Paid, "#22bb33"),
        (InvoiceStatus::Pending, "#f0ad4e"),
        (InvoiceStatus::Overdue, "#d9534f"),
        (InvoiceStatus::Other("Void".to_string()), "#666666"),
    ];
    for (status, hex) in cases {
        let mut invoice = make_invoice(vec![]);
        invoice.status = status.clone();
        let (ops, _) = record(&invoice, &acme());
        assert_eq!(first_pill_color(&ops), Some(Color::hex(hex)), "{status}");
        assert!(texts(&ops).contains(&status.as_str()));
    }
}

// ─── Notes & footer ─────────────────────────────────────────────

#[test]
fn test_notes_present_and_absent() {
    let mut invoice = scenario_invoice();
    let (ops, summary) = record(&invoice, &acme());
    assert!(!summary.notes_rendered);
    assert!(!texts(&ops).contains(&"NOTES"));

    invoice.notes = Some("Payment due in 15 days.".to_string());
    let (ops, with_notes) = record(&invoice, &acme());
    assert!(with_notes.notes_rendered);
    let t = texts(&ops);
    assert!(t.contains(&"NOTES"));
    assert!(t.contains(&"Payment due in 15 days."));
    assert!(with_notes.content_bottom > summary.content_bottom);
}

#[test]
fn test_whitespace_notes_still_draw_the_box() {
    let mut invoice = scenario_invoice();
    invoice.notes = Some("   ".to_string());
    let (_, summary) = record(&invoice, &acme());
    assert!(summary.notes_rendered);

    invoice.notes = Some(String::new());
    let (_, summary) = record(&invoice, &acme());
    assert!(!summary.notes_rendered);
}

#[test]
fn test_long_notes_are_not_cut_to_the_box() {
    let mut invoice = scenario_invoice();
    invoice.notes = Some(
        "Payment is due within 15 days. Bank transfer to Acme Corp, account \
         12345678, sort code 00-11-22. Please quote the invoice number. Any \
         disputes must be raised within 10 days of receipt of this invoice."
            .to_string(),
    );
    let (ops, summary) = record(&invoice, &acme());
    assert!(summary.notes_lines >= 3);
    assert_eq!(summary.notes_lines_dropped, 0);
    let body = texts(&ops).join(" ");
    assert!(body.contains("receipt of this invoice."));
}

#[test]
fn test_multi_line_company_address() {
    let mut company = acme();
    company.address = Some("123 Business St\nSuite 5".to_string());
    let (ops, _) = record(&scenario_invoice(), &company);
    assert!(texts(&ops).contains(&"123 Business St, Suite 5"));
    let bytes = folio::render(&scenario_invoice(), &company).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn test_footer_position_is_fixed() {
    let (ops_small, small) = record(&make_invoice(vec![]), &CompanyProfile::default());
    let mut big = make_invoice(make_items(12));
    big.notes = Some("See attached terms.".to_string());
    big.discount = 10.0;
    let (ops_big, large) = record(&big, &acme());

    assert_eq!(small.footer_y, large.footer_y);
    assert!((small.footer_y - (A4.1 - 90.0)).abs() < 1e-9);
    assert_eq!(
        text_y(&ops_small, "Thank You For Your Business"),
        text_y(&ops_big, "Thank You For Your Business")
    );
    assert!(large.content_bottom <= large.footer_y);
}

// ─── Logo ───────────────────────────────────────────────────────

#[test]
fn test_missing_logo_is_skipped() {
    let mut company = acme();
    company.logo = Some("/nonexistent/folio-logo.png".to_string());
    let surface = PdfSurface::new(PageSize::A4);
    let (bytes, summary) =
        folio::render_to(surface, &scenario_invoice(), &company).unwrap();
    assert!(!summary.logo_drawn);
    assert_valid_pdf(&bytes);
    assert!(!contains(&bytes, b"/Subtype /Image"));
}

#[test]
fn test_garbage_logo_is_skipped() {
    let mut company = acme();
    company.logo = Some("data:image/png;base64,bm90IGFuIGltYWdl".to_string());
    let bytes = folio::render(&scenario_invoice(), &company).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn test_png_logo_is_embedded() {
    let mut company = acme();
    company.logo = Some(png_data_uri());
    let surface = PdfSurface::new(PageSize::A4);
    let (bytes, summary) =
        folio::render_to(surface, &scenario_invoice(), &company).unwrap();
    assert!(summary.logo_drawn);
    assert!(contains(&bytes, b"/Subtype /Image"));
    assert!(contains(&bytes, b"/Im0"));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn test_render_produces_valid_pdf() {
    let bytes = folio::render(&scenario_invoice(), &acme()).unwrap();
    assert_valid_pdf(&bytes);
    assert!(contains(&bytes, b"/BaseFont /Helvetica"));
    assert!(contains(&bytes, b"/MediaBox [0 0 595.28 841.89]"));
}

#[test]
fn test_render_is_deterministic() {
    let mut invoice = scenario_invoice();
    invoice.notes = Some("Thanks!".to_string());
    let a = folio::render(&invoice, &acme()).unwrap();
    let b = folio::render(&invoice, &acme()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_invalid_page_size_is_an_error() {
    let surface = PdfSurface::new(PageSize::Custom {
        width: 0.0,
        height: 0.0,
    });
    let result = folio::render_to(surface, &scenario_invoice(), &acme());
    assert!(matches!(result, Err(folio::FolioError::Render(_))));
}

// ─── JSON API ───────────────────────────────────────────────────

#[test]
fn test_render_json() {
    let invoice = r#"{
        "invoiceNumber": "INV-42",
        "invoiceDate": "2026-04-01",
        "dueDate": "2026-04-15",
        "status": "Overdue",
        "client": { "name": "Initech" },
        "items": [{ "name": "TPS reports", "quantity": 3, "price": 19.5 }],
        "subtotal": 58.5,
        "tax": 0,
        "discount": 0,
        "total": 58.5
    }"#;
    let company = r#"{ "businessName": "Acme Corp" }"#;
    let bytes = folio::render_json(invoice, Some(company)).unwrap();
    assert_valid_pdf(&bytes);
    let bytes = folio::render_json(invoice, None).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn test_render_json_accepts_exported_timestamps() {
    let invoice = r#"{
        "invoiceNumber": "INV-43",
        "invoiceDate": "2026-02-14T00:00:00.000Z",
        "dueDate": "2026-03-01T00:00:00.000Z",
        "client": { "name": "Initech" },
        "items": [{ "name": "Stapler", "quantity": 0.5, "price": 0.25 }],
        "subtotal": 0.125,
        "total": 0.125
    }"#;
    let bytes = folio::render_json(invoice, None).unwrap();
    assert_valid_pdf(&bytes);

    let parsed: Invoice = serde_json::from_str(invoice).unwrap();
    let (ops, _) = record(&parsed, &CompanyProfile::default());
    let t = texts(&ops);
    assert!(t.contains(&"2/14/2026"));
    assert!(t.contains(&"3/1/2026"));
    // Half cents round up.
    assert!(t.contains(&"$0.13"));
    assert!(!t.contains(&"$0.12"));
}

#[test]
fn test_render_json_rejects_bad_input() {
    let err = folio::render_json("{ not json", None).unwrap_err();
    assert!(matches!(err, folio::FolioError::Parse { .. }));
    assert!(err.to_string().contains("Hint"));
}

#[test]
fn test_attachment_filename() {
    assert_eq!(
        folio::attachment_filename(&scenario_invoice()),
        "invoice-INV-2026-001.pdf"
    );
    assert_eq!(folio::CONTENT_TYPE, "application/pdf");
}

// ─── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_rows_never_exceed_capacity(n in 0usize..40) {
        let (_, summary) = record(&make_invoice(make_items(n)), &acme());
        prop_assert_eq!(summary.rows_rendered, n.min(MAX_TABLE_ROWS));
        prop_assert_eq!(summary.rows_rendered + summary.rows_truncated, n);
        prop_assert!(summary.content_bottom <= summary.footer_y);
    }
}
