//! Calc command - run the GST split for a single taxable amount

use super::print_gst_summary;
use crate::core::gst::{checked_amount, checked_rate};
use crate::core::{calculate_gst, JurisdictionCode};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// State code of the company (seller), e.g. 29
    #[arg(short, long)]
    company: JurisdictionCode,

    /// State code of the buyer or supplier
    #[arg(short = 'p', long)]
    counterparty: JurisdictionCode,

    /// Taxable amount before GST
    #[arg(short, long, allow_hyphen_values = true, value_parser = parse_amount)]
    amount: Decimal,

    /// Combined GST rate in percent
    #[arg(short, long, default_value = "18", value_parser = parse_rate)]
    rate: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalcOutput {
    company: JurisdictionCode,
    counterparty: JurisdictionCode,
    rate_percent: Decimal,
    taxable_amount: Decimal,
    #[serde(flatten)]
    gst: crate::core::GstBreakdown,
}

fn parse_amount(s: &str) -> anyhow::Result<Decimal> {
    Ok(checked_amount(s.trim().parse()?)?)
}

fn parse_rate(s: &str) -> anyhow::Result<Decimal> {
    Ok(checked_rate(s.trim().parse()?)?)
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let gst = calculate_gst(self.company, self.counterparty, self.rate, self.amount);

        if self.json {
            let output = CalcOutput {
                company: self.company,
                counterparty: self.counterparty,
                rate_percent: self.rate,
                taxable_amount: self.amount,
                gst,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        let supply = if gst.is_intra_state {
            "Intra-state"
        } else {
            "Inter-state"
        };
        println!();
        println!(
            "{} supply: {} {} -> {} {}",
            supply,
            self.company,
            self.company.name(),
            self.counterparty,
            self.counterparty.name()
        );
        print_gst_summary(self.amount, self.rate, &gst);
        Ok(())
    }
}
