pub mod document;
pub mod gst;
pub mod jurisdiction;
pub mod warnings;
pub mod words;

// Flat public surface for domain types and functions.
pub use document::{
    read_document_json, read_line_items_csv, Document, DocumentInput, LineItemRecord,
    PricedDocument,
};
pub use gst::{calculate_gst, GstBreakdown};
pub use jurisdiction::JurisdictionCode;
pub use warnings::Warning;
pub use words::amount_in_words;
