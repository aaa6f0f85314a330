use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data-quality issues found in a document. None of them block pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Document has no line items, so every total is zero.
    EmptyDocument,
    /// Line item (1-based) with zero quantity.
    ZeroQuantity { line: usize },
    /// Line item (1-based) with a negative quantity.
    NegativeQuantity { line: usize },
    /// Line item (1-based) with a negative unit price.
    NegativeUnitPrice { line: usize },
    /// Subtotal is negative; the tax on it is negative too.
    NegativeSubtotal {
        #[schemars(with = "f64")]
        subtotal: Decimal,
    },
    /// Rate is not one of the GST slabs.
    NonStandardRate {
        #[schemars(with = "f64")]
        rate: Decimal,
    },
    /// Invoice issued without the company's GSTIN.
    MissingCompanyGstin,
}

impl Warning {
    pub fn message(&self) -> String {
        match self {
            Warning::EmptyDocument => "Document has no line items".to_string(),
            Warning::ZeroQuantity { line } => format!("Line {line} has zero quantity"),
            Warning::NegativeQuantity { line } => format!("Line {line} has a negative quantity"),
            Warning::NegativeUnitPrice { line } => {
                format!("Line {line} has a negative unit price")
            }
            Warning::NegativeSubtotal { subtotal } => {
                format!("Subtotal is negative ({subtotal:.2}); GST will be negative")
            }
            Warning::NonStandardRate { rate } => {
                format!("GST rate {rate}% is not a standard slab")
            }
            Warning::MissingCompanyGstin => "Invoice has no company GSTIN".to_string(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Warning::EmptyDocument => "EmptyDocument",
            Warning::ZeroQuantity { .. } => "ZeroQuantity",
            Warning::NegativeQuantity { .. } => "NegativeQuantity",
            Warning::NegativeUnitPrice { .. } => "NegativeUnitPrice",
            Warning::NegativeSubtotal { .. } => "NegativeSubtotal",
            Warning::NonStandardRate { .. } => "NonStandardRate",
            Warning::MissingCompanyGstin => "MissingCompanyGstin",
        }
    }
}
