//! Words command - print an amount in words, Indian numbering

use crate::core::amount_in_words;
use clap::Args;
use rust_decimal::Decimal;

/// Print an amount in words, Indian numbering
#[derive(Args, Debug)]
pub struct WordsCommand {
    /// Amount in rupees, e.g. 1180 or 373.33
    #[arg(allow_hyphen_values = true)]
    amount: Decimal,
}

impl WordsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        println!("{}", amount_in_words(self.amount));
        Ok(())
    }
}
