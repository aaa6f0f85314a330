pub mod calc;
pub mod document;
pub mod schema;
pub mod states;
pub mod validate;
pub mod words;

use crate::core::{read_document_json, read_line_items_csv, Document, GstBreakdown};
use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Read a document (JSON) from a file, or from stdin with "-".
///
/// When `items` is given, the line items in that CSV replace the document's own.
pub fn read_document(path: &Path, items: Option<&Path>) -> anyhow::Result<Document> {
    let mut document = if path.as_os_str() == "-" {
        read_from_stdin()?
    } else {
        read_from_file(path)?
    };

    if let Some(items_path) = items {
        let file = File::open(items_path)
            .with_context(|| format!("opening line items {}", items_path.display()))?;
        document.items = read_line_items_csv(BufReader::new(file))
            .with_context(|| format!("reading line items {}", items_path.display()))?;
        log::info!(
            "Loaded {} line items from {}",
            document.items.len(),
            items_path.display()
        );
    }

    Ok(document)
}

fn read_from_file(path: &Path) -> anyhow::Result<Document> {
    let file =
        File::open(path).with_context(|| format!("opening document {}", path.display()))?;
    let reader = BufReader::new(file);
    read_document_json(reader).with_context(|| format!("reading document {}", path.display()))
}

fn read_from_stdin() -> anyhow::Result<Document> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_document_json(io::Cursor::new(buffer))
}

fn format_inr(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-\u{20B9}{:.2}", amount.abs())
    } else {
        format!("\u{20B9}{:.2}", amount)
    }
}

/// Row of the GST summary panel
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Print the tax summary panel shown under a document's line items
fn print_gst_summary(taxable: Decimal, rate: Decimal, gst: &GstBreakdown) {
    let mut rows = vec![SummaryRow {
        label: "Taxable value".to_string(),
        rate: String::new(),
        amount: format_inr(taxable),
    }];

    if gst.is_intra_state {
        let half = format!("{}%", (rate / dec!(2)).normalize());
        rows.push(SummaryRow {
            label: "CGST".to_string(),
            rate: half.clone(),
            amount: format_inr(gst.cgst),
        });
        rows.push(SummaryRow {
            label: "SGST".to_string(),
            rate: half,
            amount: format_inr(gst.sgst),
        });
    } else {
        rows.push(SummaryRow {
            label: "IGST".to_string(),
            rate: format!("{}%", rate.normalize()),
            amount: format_inr(gst.igst),
        });
    }

    rows.push(SummaryRow {
        label: "Total GST".to_string(),
        rate: String::new(),
        amount: format_inr(gst.total_gst),
    });
    rows.push(SummaryRow {
        label: "Grand total".to_string(),
        rate: String::new(),
        amount: format_inr(gst.total_amount),
    });

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}
