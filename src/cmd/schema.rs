//! Schema command - print expected input and output formats

use crate::core::{DocumentInput, LineItemRecord, PricedDocument};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the document input
    JsonSchema,
    /// JSON Schema for the priced document produced by `document --json`
    OutputSchema,
    /// CSV header row for line items
    CsvHeader,
    /// CSV line item column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(DocumentInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::OutputSchema => {
                let schema = schema_for!(PricedDocument);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", LineItemRecord::csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("Line Item CSV Format");
    println!("====================");
    println!();
    for field in LineItemRecord::csv_fields() {
        let req = if field.required { "required" } else { "optional" };
        println!("{:12} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("Amounts are in rupees before GST; each line is rounded to paise.");
}
