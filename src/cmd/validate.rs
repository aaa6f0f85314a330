//! Validate command - surface data quality issues in a document without pricing it

use super::read_document;
use crate::core::Warning;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// JSON file containing the document ("-" for stdin)
    #[arg(short, long)]
    document: PathBuf,

    /// CSV file of line items replacing the document's own
    #[arg(short, long)]
    items: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    document: String,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let document = read_document(&self.document, self.items.as_deref())?;
        let label = match document.number {
            Some(ref number) => format!("{} {}", document.kind, number),
            None => document.kind.to_string(),
        };

        let mut issues: Vec<ValidationIssue> =
            document.warnings().iter().map(issue_from_warning).collect();

        // errors that stop pricing are reported as issues too
        if let Err(err) = document.price() {
            issues.push(ValidationIssue {
                issue_type: err.type_name().to_string(),
                message: err.to_string(),
            });
        }

        if self.json {
            let output = ValidationOutput {
                document: label,
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&label, &issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn issue_from_warning(warning: &Warning) -> ValidationIssue {
    ValidationIssue {
        issue_type: warning.type_name().to_string(),
        message: warning.message(),
    }
}

fn print_text(label: &str, issues: &[ValidationIssue]) {
    println!();
    println!("VALIDATION RESULTS ({})", label);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
    } else {
        println!("\u{26A0} {} issue(s) found:", issues.len());
        println!();
        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.message);
        }
        println!();
    }
}
