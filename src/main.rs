use clap::{Parser, Subcommand};

mod cmd;
mod core;

/// GST calculator for quotations, purchase orders and invoices
#[derive(Parser, Debug)]
#[command(name = "gstc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split GST on a single taxable amount
    Calc(cmd::calc::CalcCommand),
    /// Price a document from its line items
    Document(cmd::document::DocumentCommand),
    /// Check a document for data quality issues
    Validate(cmd::validate::ValidateCommand),
    /// Print input and output formats
    Schema(cmd::schema::SchemaCommand),
    /// Print an amount in words
    Words(cmd::words::WordsCommand),
    /// List GST state codes
    States(cmd::states::StatesCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli.command);

    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Document(document) => document.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Words(words) => words.exec(),
        Command::States(states) => states.exec(),
    }
}
