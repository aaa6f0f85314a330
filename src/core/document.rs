use super::gst::{
    calculate_gst, checked_amount, checked_rate, round_money, AmountError, GstBreakdown,
    DEFAULT_GST_RATE, MAX_AMOUNT,
};
use super::jurisdiction::{Gstin, JurisdictionCode};
use super::warnings::Warning;
use super::words::amount_in_words;
use chrono::NaiveDate;
use gstc_derive::CsvSchema;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("{party}: no state code or GSTIN to determine its jurisdiction")]
    MissingJurisdiction { party: String },
    #[error("{party}: state code {state_code} does not match GSTIN {gstin}")]
    JurisdictionMismatch {
        party: String,
        state_code: JurisdictionCode,
        gstin: Gstin,
    },
    #[error("line {line}: quantity times unit price is out of range (magnitude above {max})", max = MAX_AMOUNT)]
    AmountOutOfRange { line: usize },
    #[error("subtotal is out of range (magnitude above {max})", max = MAX_AMOUNT)]
    SubtotalOutOfRange,
    #[error(transparent)]
    Rate(#[from] AmountError),
}

impl DocumentError {
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentError::MissingJurisdiction { .. }
            | DocumentError::JurisdictionMismatch { .. } => "Jurisdiction",
            DocumentError::AmountOutOfRange { .. }
            | DocumentError::SubtotalOutOfRange
            | DocumentError::Rate(_) => "OutOfRange",
        }
    }
}

/// GST slabs currently notified, in percent
const STANDARD_RATES: &[Decimal] = &[
    dec!(0),
    dec!(0.1),
    dec!(0.25),
    dec!(3),
    dec!(5),
    dec!(12),
    dec!(18),
    dec!(28),
];

/// Input root for document JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentInput {
    pub document: Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DocumentKind {
    Quotation,
    PurchaseOrder,
    PurchaseReturn,
    SalesOrder,
    SalesReturn,
    Invoice,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Quotation => "Quotation",
            DocumentKind::PurchaseOrder => "Purchase Order",
            DocumentKind::PurchaseReturn => "Purchase Return",
            DocumentKind::SalesOrder => "Sales Order",
            DocumentKind::SalesReturn => "Sales Return",
            DocumentKind::Invoice => "Invoice",
        };
        f.write_str(s)
    }
}

/// Company or counter-party on a document
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Party {
    pub name: String,
    /// GST state code as a string ("07") or an integer (7); derived from the
    /// GSTIN when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<JurisdictionCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub gstin: Option<Gstin>,
}

impl Party {
    /// Jurisdiction used for the intra/inter-state decision
    pub fn jurisdiction(&self) -> Result<JurisdictionCode, DocumentError> {
        match (self.state_code, &self.gstin) {
            (Some(state_code), Some(gstin)) if gstin.jurisdiction() != state_code => {
                Err(DocumentError::JurisdictionMismatch {
                    party: self.name.clone(),
                    state_code,
                    gstin: gstin.clone(),
                })
            }
            (Some(state_code), _) => Ok(state_code),
            (None, Some(gstin)) => Ok(gstin.jurisdiction()),
            (None, None) => Err(DocumentError::MissingJurisdiction {
                party: self.name.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[schemars(with = "f64")]
    pub unit_price: Decimal,
}

impl LineItem {
    /// Quantity times unit price, rounded to paise. `None` when the product is
    /// out of range.
    pub fn amount(&self) -> Option<Decimal> {
        self.quantity
            .checked_mul(self.unit_price)
            .and_then(|amount| checked_amount(amount).ok())
            .map(round_money)
    }
}

fn default_rate() -> Decimal {
    DEFAULT_GST_RATE
}

/// A quotation, order, return or invoice before its totals are computed
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    pub kind: DocumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub company: Party,
    pub counterparty: Party,
    /// Combined GST rate in percent (defaults to 18)
    #[serde(default = "default_rate")]
    #[schemars(with = "f64")]
    pub gst_rate: Decimal,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Totals derived from a document's line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentTotals {
    #[schemars(with = "f64")]
    pub subtotal: Decimal,
    pub gst: GstBreakdown,
    pub amount_in_words: String,
}

/// Document with its totals embedded, as handed to storage or the backend
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PricedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub totals: DocumentTotals,
}

impl Document {
    /// Sum of the rounded line amounts
    pub fn subtotal(&self) -> Result<Decimal, DocumentError> {
        self.items
            .iter()
            .enumerate()
            .try_fold(round_money(Decimal::ZERO), |sum, (i, item)| {
                let amount = item
                    .amount()
                    .ok_or(DocumentError::AmountOutOfRange { line: i + 1 })?;
                sum.checked_add(amount)
                    .filter(|sum| checked_amount(*sum).is_ok())
                    .ok_or(DocumentError::SubtotalOutOfRange)
            })
    }

    /// Compute totals from scratch. Any earlier totals are never reused.
    pub fn price(&self) -> Result<PricedDocument, DocumentError> {
        let company = self.company.jurisdiction()?;
        let counterparty = self.counterparty.jurisdiction()?;
        let rate = checked_rate(self.gst_rate)?;
        let subtotal = self.subtotal()?;
        let gst = calculate_gst(company, counterparty, rate, subtotal);

        log::debug!(
            "priced {} {}: subtotal {} gst {} ({} -> {})",
            self.kind,
            self.number.as_deref().unwrap_or("-"),
            subtotal,
            gst.total_gst,
            company,
            counterparty
        );

        Ok(PricedDocument {
            document: self.clone(),
            totals: DocumentTotals {
                subtotal,
                gst,
                amount_in_words: amount_in_words(gst.total_amount),
            },
        })
    }

    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();

        if self.items.is_empty() {
            warnings.push(Warning::EmptyDocument);
        }
        for (i, item) in self.items.iter().enumerate() {
            let line = i + 1;
            if item.quantity.is_zero() {
                warnings.push(Warning::ZeroQuantity { line });
            } else if item.quantity.is_sign_negative() {
                warnings.push(Warning::NegativeQuantity { line });
            }
            if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
                warnings.push(Warning::NegativeUnitPrice { line });
            }
        }

        // an out of range subtotal is reported by pricing
        if let Ok(subtotal) = self.subtotal() {
            if subtotal < Decimal::ZERO {
                warnings.push(Warning::NegativeSubtotal { subtotal });
            }
        }
        if !STANDARD_RATES.contains(&self.gst_rate) {
            warnings.push(Warning::NonStandardRate {
                rate: self.gst_rate,
            });
        }
        if self.kind == DocumentKind::Invoice && self.company.gstin.is_none() {
            warnings.push(Warning::MissingCompanyGstin);
        }

        warnings
    }
}

/// Read a document from JSON
pub fn read_document_json<R: Read>(reader: R) -> anyhow::Result<Document> {
    let input: DocumentInput = serde_json::from_reader(reader)?;
    Ok(input.document)
}

/// One column of a CSV input format
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// CSV record format for line items
#[derive(Debug, Clone, Serialize, Deserialize, CsvSchema)]
pub struct LineItemRecord {
    /// Item or service description
    pub description: String,
    /// HSN or SAC code
    #[serde(default)]
    pub hsn: Option<String>,
    /// Unit of measure (e.g., Nos, Kg, Hrs)
    #[serde(default)]
    pub unit: Option<String>,
    /// Quantity supplied
    pub quantity: Decimal,
    /// Price per unit before GST
    #[serde(rename = "unit_price")]
    pub unit_price: Decimal,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        LineItem {
            description: record.description,
            hsn: record.hsn.filter(|s| !s.trim().is_empty()),
            unit: record.unit.filter(|s| !s.trim().is_empty()),
            quantity: record.quantity,
            unit_price: record.unit_price,
        }
    }
}

/// Read line items from CSV with a header row
pub fn read_line_items_csv<R: Read>(reader: R) -> anyhow::Result<Vec<LineItem>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut items = Vec::new();
    for result in rdr.deserialize() {
        let record: LineItemRecord = result?;
        items.push(record.into());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> JurisdictionCode {
        s.parse().unwrap()
    }

    fn party(name: &str, state: &str) -> Party {
        Party {
            name: name.to_string(),
            state_code: Some(code(state)),
            gstin: None,
        }
    }

    fn item(quantity: Decimal, unit_price: Decimal) -> LineItem {
        LineItem {
            description: "PLC panel wiring".to_string(),
            hsn: None,
            unit: None,
            quantity,
            unit_price,
        }
    }

    fn quotation(counterparty_state: &str, items: Vec<LineItem>) -> Document {
        Document {
            kind: DocumentKind::Quotation,
            number: Some("Q-001".to_string()),
            date: None,
            company: party("Acme Automation", "29"),
            counterparty: party("Buyer Ltd", counterparty_state),
            gst_rate: dec!(18),
            items,
        }
    }

    #[test]
    fn line_amount_rounds_to_paise() {
        assert_eq!(item(dec!(3), dec!(33.333)).amount(), Some(dec!(100.00)));
        assert_eq!(item(dec!(2.5), dec!(10.01)).amount(), Some(dec!(25.03)));
    }

    #[test]
    fn subtotal_sums_rounded_lines() {
        let doc = quotation(
            "29",
            vec![item(dec!(1), dec!(0.005)), item(dec!(1), dec!(0.005))],
        );
        // each line rounds to 0.01 on its own
        assert_eq!(doc.subtotal(), Ok(dec!(0.02)));
    }

    #[test]
    fn prices_intra_state_quotation() {
        let doc = quotation("29", vec![item(dec!(2), dec!(250)), item(dec!(5), dec!(100))]);
        let priced = doc.price().unwrap();
        assert_eq!(priced.totals.subtotal, dec!(1000));
        assert!(priced.totals.gst.is_intra_state);
        assert_eq!(priced.totals.gst.cgst, dec!(90));
        assert_eq!(priced.totals.gst.sgst, dec!(90));
        assert_eq!(priced.totals.gst.total_amount, dec!(1180));
        assert_eq!(
            priced.totals.amount_in_words,
            "Rupees One Thousand One Hundred Eighty Only"
        );
    }

    #[test]
    fn prices_inter_state_quotation() {
        let doc = quotation("27", vec![item(dec!(1), dec!(1000))]);
        let gst = doc.price().unwrap().totals.gst;
        assert!(!gst.is_intra_state);
        assert_eq!(gst.igst, dec!(180));
    }

    #[test]
    fn repricing_reflects_changed_inputs() {
        let mut doc = quotation("29", vec![item(dec!(1), dec!(1000))]);
        let first = doc.price().unwrap();
        doc.gst_rate = dec!(12);
        doc.counterparty = party("Buyer Ltd", "27");
        let second = doc.price().unwrap();
        assert!(first.totals.gst.is_intra_state);
        assert!(!second.totals.gst.is_intra_state);
        assert_eq!(second.totals.gst.igst, dec!(120));
    }

    #[test]
    fn jurisdiction_from_gstin() {
        let p = Party {
            name: "Buyer Ltd".to_string(),
            state_code: None,
            gstin: Some("27AAPFU0939F1ZV".parse().unwrap()),
        };
        assert_eq!(p.jurisdiction(), Ok(code("27")));
    }

    #[test]
    fn jurisdiction_conflict_is_an_error() {
        let p = Party {
            name: "Buyer Ltd".to_string(),
            state_code: Some(code("29")),
            gstin: Some("27AAPFU0939F1ZV".parse().unwrap()),
        };
        assert!(matches!(
            p.jurisdiction(),
            Err(DocumentError::JurisdictionMismatch { .. })
        ));
    }

    #[test]
    fn missing_jurisdiction_is_an_error() {
        let mut doc = quotation("29", vec![item(dec!(1), dec!(10))]);
        doc.counterparty.state_code = None;
        assert_eq!(
            doc.price().unwrap_err(),
            DocumentError::MissingJurisdiction {
                party: "Buyer Ltd".to_string()
            }
        );
    }

    #[test]
    fn clean_document_has_no_warnings() {
        let doc = quotation("29", vec![item(dec!(1), dec!(10))]);
        assert!(doc.warnings().is_empty());
    }

    #[test]
    fn warnings_for_bad_lines() {
        let mut doc = quotation(
            "29",
            vec![
                item(dec!(0), dec!(10)),
                item(dec!(-2), dec!(10)),
                item(dec!(1), dec!(-5)),
            ],
        );
        doc.gst_rate = dec!(15);
        assert_eq!(
            doc.warnings(),
            vec![
                Warning::ZeroQuantity { line: 1 },
                Warning::NegativeQuantity { line: 2 },
                Warning::NegativeUnitPrice { line: 3 },
                Warning::NegativeSubtotal {
                    subtotal: dec!(-25)
                },
                Warning::NonStandardRate { rate: dec!(15) },
            ]
        );
    }

    #[test]
    fn warnings_for_empty_invoice() {
        let mut doc = quotation("29", vec![]);
        doc.kind = DocumentKind::Invoice;
        assert_eq!(
            doc.warnings(),
            vec![Warning::EmptyDocument, Warning::MissingCompanyGstin]
        );
    }

    #[test]
    fn reads_document_json_with_numeric_state_codes() {
        let json = r#"{
            "document": {
                "kind": "Invoice",
                "number": "INV-7",
                "date": "2024-06-01",
                "company": { "name": "Acme Automation", "gstin": "29AABCU9603R1ZJ" },
                "counterparty": { "name": "Buyer Ltd", "state_code": 29 },
                "items": [
                    { "description": "Servo drive", "quantity": "2", "unit_price": "1500.50" }
                ]
            }
        }"#;
        let doc = read_document_json(json.as_bytes()).unwrap();
        assert_eq!(doc.gst_rate, dec!(18));
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2024, 6, 1));
        let priced = doc.price().unwrap();
        assert!(priced.totals.gst.is_intra_state);
        assert_eq!(priced.totals.subtotal, dec!(3001.00));
        assert_eq!(priced.totals.gst.cgst, dec!(270.09));
        assert_eq!(priced.totals.gst.total_amount, dec!(3541.18));
    }

    #[test]
    fn priced_document_embeds_totals() {
        let doc = quotation("27", vec![item(dec!(1), dec!(1000))]);
        let json = serde_json::to_value(doc.price().unwrap()).unwrap();
        assert_eq!(json["kind"], "Quotation");
        assert_eq!(json["company"]["state_code"], "29");
        let igst: Decimal = json["totals"]["gst"]["igst"].as_str().unwrap().parse().unwrap();
        assert_eq!(igst, dec!(180));
        assert_eq!(json["totals"]["gst"]["isIntraState"], false);
    }

    #[test]
    fn out_of_range_amounts_are_errors() {
        let huge = item(dec!(100000000000000), dec!(1000000000000000));
        assert_eq!(huge.amount(), None);

        let doc = quotation("29", vec![item(dec!(1), dec!(10)), huge]);
        assert_eq!(
            doc.subtotal(),
            Err(DocumentError::AmountOutOfRange { line: 2 })
        );
        let err = doc.price().unwrap_err();
        assert_eq!(err.type_name(), "OutOfRange");
        assert!(err.to_string().starts_with("line 2:"));
        // warnings still come back rather than failing
        assert!(doc.warnings().is_empty());

        // each line fits, the sum does not
        let doc = quotation(
            "29",
            vec![item(dec!(1), MAX_AMOUNT), item(dec!(1), MAX_AMOUNT)],
        );
        assert_eq!(doc.subtotal(), Err(DocumentError::SubtotalOutOfRange));

        let mut doc = quotation("29", vec![item(dec!(1), dec!(10))]);
        doc.gst_rate = dec!(1000);
        assert_eq!(
            doc.price().unwrap_err(),
            DocumentError::Rate(AmountError::RateOutOfRange(dec!(1000)))
        );
    }

    #[test]
    fn priced_money_fields_have_two_decimal_places() {
        let doc = quotation("27", vec![item(dec!(4), dec!(250))]);
        let json = serde_json::to_value(doc.price().unwrap()).unwrap();
        let totals = &json["totals"];
        assert_eq!(totals["subtotal"], "1000.00");
        assert_eq!(totals["gst"]["igst"], "180.00");
        assert_eq!(totals["gst"]["cgst"], "0.00");
        assert_eq!(totals["gst"]["totalAmount"], "1180.00");
    }

    #[test]
    fn state_code_schema_accepts_strings_and_integers() {
        let schema = serde_json::to_value(schemars::schema_for!(DocumentInput)).unwrap();
        let any_of = schema["definitions"]["JurisdictionCode"]["anyOf"]
            .as_array()
            .unwrap();
        let types: Vec<&str> = any_of
            .iter()
            .map(|s| s["type"].as_str().unwrap())
            .collect();
        assert_eq!(types, ["string", "integer"]);
    }

    #[test]
    fn reads_line_items_csv() {
        let csv = "description,hsn,unit,quantity,unit_price\n\
                   Proximity sensor,8536,Nos,10,450\n\
                   Commissioning, ,Hrs,4, 1200.00\n";
        let items = read_line_items_csv(csv.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].hsn.as_deref(), Some("8536"));
        assert_eq!(items[1].hsn, None);
        assert_eq!(items[1].amount(), Some(dec!(4800)));
    }

    #[test]
    fn line_item_csv_schema() {
        assert_eq!(
            LineItemRecord::csv_header(),
            "description,hsn,unit,quantity,unit_price"
        );
        let fields = LineItemRecord::csv_fields();
        assert!(fields[0].required);
        assert!(!fields[1].required);
        assert_eq!(fields[4].description, "Price per unit before GST");
    }
}
