//! States command - list GST state codes

use crate::core::JurisdictionCode;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct StatesCommand {
    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct StateRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "State / Territory")]
    name: &'static str,
}

impl StatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows: Vec<StateRow> = JurisdictionCode::all()
            .map(|code| StateRow {
                code: code.to_string(),
                name: code.name(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        Ok(())
    }
}
