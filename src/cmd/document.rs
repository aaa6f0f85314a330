//! Document command - price a quotation, order, return or invoice from its line items

use super::{format_inr, print_gst_summary, read_document};
use crate::core::{Document, PricedDocument};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct DocumentCommand {
    /// JSON file containing the document ("-" for stdin)
    #[arg(short, long)]
    document: PathBuf,

    /// CSV file of line items replacing the document's own
    #[arg(short, long)]
    items: Option<PathBuf>,

    /// Override the document's GST rate (percent)
    #[arg(short, long)]
    rate: Option<Decimal>,

    /// Output the priced document as JSON
    #[arg(long)]
    json: bool,
}

/// Row for the line items table
#[derive(Debug, Clone, Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    line: usize,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "HSN")]
    hsn: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl DocumentCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut document = read_document(&self.document, self.items.as_deref())?;
        if let Some(rate) = self.rate {
            log::info!("Overriding GST rate {}% with {}%", document.gst_rate, rate);
            document.gst_rate = rate;
        }

        for warning in document.warnings() {
            log::warn!("{}", warning.message());
        }

        let priced = document.price()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&priced)?);
        } else {
            print_document(&priced);
        }
        Ok(())
    }
}

fn print_document(priced: &PricedDocument) {
    let document = &priced.document;
    let totals = &priced.totals;

    println!();
    print_header(document);
    println!();

    if document.items.is_empty() {
        println!("No line items");
    } else {
        let rows: Vec<ItemRow> = document
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| ItemRow {
                line: i + 1,
                description: item.description.clone(),
                hsn: item.hsn.clone().unwrap_or_default(),
                quantity: item.quantity.normalize().to_string(),
                unit: item.unit.clone().unwrap_or_default(),
                unit_price: format_inr(item.unit_price),
                amount: item.amount().map(format_inr).unwrap_or_default(),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
            .with(Modify::new(Columns::new(5..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    print_gst_summary(totals.subtotal, document.gst_rate, &totals.gst);
    println!("{}", totals.amount_in_words);
    println!();
}

fn print_header(document: &Document) {
    let mut title = document.kind.to_string().to_uppercase();
    if let Some(ref number) = document.number {
        title.push_str(&format!(" {}", number));
    }
    if let Some(date) = document.date {
        title.push_str(&format!(" ({})", date.format("%d-%m-%Y")));
    }
    println!("{}", title);

    for (label, party) in [("From", &document.company), ("To", &document.counterparty)] {
        let place = party
            .jurisdiction()
            .map(|code| format!("{} {}", code, code.name()))
            .unwrap_or_default();
        match party.gstin {
            Some(ref gstin) => println!(
                "  {}: {} [{}] GSTIN {} PAN {}",
                label,
                party.name,
                place,
                gstin,
                gstin.pan()
            ),
            None => println!("  {}: {} [{}]", label, party.name, place),
        }
    }
}
