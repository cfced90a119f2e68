//! Shipment record extraction from carrier invoice text.

mod lines;
mod parser;
pub mod rules;

pub use lines::{ANCHOR_MARKER, is_anchor, normalize_lines};
pub use parser::{ExtractionResult, ShipmentParser, SkipReason};
pub use rules::BlockFormat;

use crate::models::shipment::ShipmentRecord;

/// Trait for shipment record extractors.
pub trait ShipmentExtractor {
    /// Parse a document's text, keeping diagnostics.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Extract the shipment records of a document, in document order.
    fn extract(&self, text: &str) -> Vec<ShipmentRecord> {
        self.parse(text).records
    }
}

/// Extract shipment records with the default rules.
///
/// Total over all inputs: text without any `Ship Date` anchor, including
/// empty text, yields no records.
pub fn extract(text: &str) -> Vec<ShipmentRecord> {
    ShipmentParser::new().extract(text)
}
