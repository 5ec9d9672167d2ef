//! # Folio CLI
//!
//! Usage:
//!   folio invoice.json --company company.json
//!   cat invoice.json | folio - -o out.pdf
//!   folio invoice.json --dump-ops > ops.json
//!   folio --example > invoice.json

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio::model::{CompanyProfile, Invoice};
use folio::surface::RecordingSurface;
use folio::FolioError;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Render an invoice to a one-page PDF")]
struct Cli {
    /// Invoice JSON file, or `-` for stdin.
    #[arg(required_unless_present = "example")]
    invoice: Option<String>,

    /// Company profile JSON file.
    #[arg(long)]
    company: Option<PathBuf>,

    /// Output path. Defaults to `invoice-<number>.pdf`.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Write the display list as JSON to stdout instead of a PDF.
    #[arg(long, default_value_t = false)]
    dump_ops: bool,

    /// Print a sample invoice JSON and exit.
    #[arg(long, default_value_t = false)]
    example: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), FolioError> {
    if cli.example {
        print!("{}", example_invoice_json());
        return Ok(());
    }

    let input = match cli.invoice.as_deref() {
        Some("-") | None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => fs::read_to_string(path)?,
    };
    let invoice: Invoice = serde_json::from_str(&input)?;
    let company: CompanyProfile = match &cli.company {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => CompanyProfile::default(),
    };

    if cli.dump_ops {
        let (width, height) = folio::model::PageSize::A4.dimensions();
        let (ops, summary) =
            folio::render_to(RecordingSurface::new(width, height), &invoice, &company)?;
        info!(ops = ops.len(), rows = summary.rows_rendered, "display list recorded");
        let json = serde_json::to_string_pretty(&ops)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }

    let pdf = folio::render(&invoice, &company)?;
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(folio::attachment_filename(&invoice)));
    fs::write(&output, &pdf)?;
    eprintln!("✓ Written {} bytes to {}", pdf.len(), output.display());
    Ok(())
}

fn example_invoice_json() -> &'static str {
    r##"{
  "invoiceNumber": "INV-2026-001",
  "invoiceDate": "2026-02-14",
  "dueDate": "2026-03-01",
  "status": "Paid",
  "client": {
    "name": "Widget Industries",
    "email": "accounts@widget.test",
    "phone": "555-0142",
    "address": "42 Commerce Way, Springfield"
  },
  "items": [
    { "name": "Web Design", "quantity": 1, "price": 1500 },
    { "name": "Development", "quantity": 40, "price": 100 }
  ],
  "subtotal": 5500,
  "tax": 550,
  "discount": 0,
  "total": 6050,
  "notes": "Payment is due within 15 days. Thank you for choosing us."
}
"##
}
