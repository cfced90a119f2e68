//! Block layouts and their field rules.
//!
//! A shipment block comes in one of three undeclared layouts. The line
//! right above the air waybill line tells them apart, and each layout
//! places the customer name and order number differently.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::fields::last_two_tokens;
use super::patterns::{ORDER_DIGIT_RUN, ORDER_LINE_REJECT, ORDER_TOKEN};
use crate::shipment::lines::window;

/// Layout of a single shipment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockFormat {
    /// Customer name trails the air waybill line; order number sits below it.
    #[default]
    Standard,
    /// Preceded by a `Tendered Date ... FIRST LAST` line.
    TenderedDate,
    /// Preceded by a `Customs Entry Date ... FIRST LAST` line.
    CustomsEntryDate,
}

impl BlockFormat {
    /// Classify a block by the line preceding its air waybill line.
    pub fn classify(customer_line: &str) -> Self {
        if customer_line.contains("Tendered Date") {
            Self::TenderedDate
        } else if customer_line.contains("Customs Entry Date") {
            Self::CustomsEntryDate
        } else {
            Self::Standard
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::TenderedDate => "tendered date",
            Self::CustomsEntryDate => "customs entry date",
        }
    }

    /// Resolve the customer name.
    ///
    /// `customer_line` is `None` when the air waybill line is the first
    /// line of the document; the name is then left empty.
    pub fn customer_name(self, customer_line: Option<&str>, awb_line: &str) -> String {
        match (self, customer_line) {
            (_, None) => String::new(),
            (Self::TenderedDate | Self::CustomsEntryDate, Some(line)) => last_two_tokens(line),
            (Self::Standard, Some(_)) => last_two_tokens(awb_line),
        }
    }

    /// Resolve the order number for the block whose air waybill line is
    /// `lines[awb_idx]`.
    ///
    /// `search_lines` bounds the look-ahead of the standard layout.
    pub fn order_number(self, lines: &[&str], awb_idx: usize, search_lines: usize) -> String {
        let awb_line = lines.get(awb_idx).copied().unwrap_or_default();

        match self {
            Self::TenderedDate => ORDER_DIGIT_RUN
                .find_iter(awb_line)
                .last()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            Self::CustomsEntryDate => ORDER_TOKEN
                .find_iter(awb_line)
                .last()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            Self::Standard => {
                let candidates = window(lines, awb_idx + 1, awb_idx.saturating_add(search_lines));
                standard_order_number(candidates)
            }
        }
    }
}

/// First 4-digit token of the first line that is not part of a longer
/// identifier or a date.
fn standard_order_number(candidates: &[&str]) -> String {
    for line in candidates {
        let Some(token) = ORDER_TOKEN.find(line) else {
            continue;
        };
        if ORDER_LINE_REJECT.is_match(line) {
            trace!("Rejected order candidate {} in {:?}", token.as_str(), line);
            continue;
        }
        return token.as_str().to_string();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            BlockFormat::classify("Tendered Date 04/17/2025 BEN VIC VIC"),
            BlockFormat::TenderedDate
        );
        assert_eq!(
            BlockFormat::classify("Customs Entry Date 03/22/2025 DARIA BENJAMIN ATTARD"),
            BlockFormat::CustomsEntryDate
        );
        assert_eq!(BlockFormat::classify("Ship Date 04/17/2025"), BlockFormat::Standard);
        assert_eq!(BlockFormat::classify(""), BlockFormat::Standard);
    }

    #[test]
    fn test_customer_name_by_format() {
        let awb = "Air Waybill Number 123456789012 ACME CORP";

        assert_eq!(
            BlockFormat::TenderedDate
                .customer_name(Some("Tendered Date 04/17/2025 BEN VIC VIC"), awb),
            "VIC VIC"
        );
        assert_eq!(
            BlockFormat::CustomsEntryDate.customer_name(
                Some("Customs Entry Date 03/22/2025 DARIA BENJAMIN ATTARD"),
                awb
            ),
            "BENJAMIN ATTARD"
        );
        assert_eq!(
            BlockFormat::Standard.customer_name(Some("Ship Date 04/17/2025"), awb),
            "ACME CORP"
        );
        assert_eq!(BlockFormat::Standard.customer_name(None, awb), "");
        assert_eq!(BlockFormat::TenderedDate.customer_name(Some("Tendered"), awb), "");
    }

    #[test]
    fn test_tendered_order_uses_unanchored_runs() {
        let lines = ["Air Waybill Number 987654321098 98765"];
        // runs: 9876 5432 1098 9876
        assert_eq!(BlockFormat::TenderedDate.order_number(&lines, 0, 5), "9876");

        let lines = ["Air Waybill Number 123456789012 1234"];
        assert_eq!(BlockFormat::TenderedDate.order_number(&lines, 0, 5), "1234");

        let lines = ["Air Waybill Number"];
        assert_eq!(BlockFormat::TenderedDate.order_number(&lines, 0, 5), "");
    }

    #[test]
    fn test_customs_order_needs_word_boundaries() {
        let lines = ["Air Waybill Number 987654321098 98765"];
        assert_eq!(BlockFormat::CustomsEntryDate.order_number(&lines, 0, 5), "");

        let lines = ["Air Waybill Number 987654321098 4321 12345 8765"];
        assert_eq!(BlockFormat::CustomsEntryDate.order_number(&lines, 0, 5), "8765");
    }

    #[test]
    fn test_standard_order_skips_rejected_lines() {
        let lines = [
            "Air Waybill Number 111122223333 ACME CORP",
            "Reference INV1234567 5555",
            "Dept 06/15/2025 7777",
            "PO 4242 extra 1234",
        ];
        assert_eq!(BlockFormat::Standard.order_number(&lines, 0, 5), "4242");
    }

    #[test]
    fn test_standard_order_window() {
        let lines = [
            "Air Waybill Number 111122223333 ACME CORP",
            "one",
            "two",
            "three",
            "four",
            "five",
            "PO 4242",
        ];
        assert_eq!(BlockFormat::Standard.order_number(&lines, 0, 5), "");
        assert_eq!(BlockFormat::Standard.order_number(&lines, 0, 6), "4242");
        // the air waybill line itself is never a source
        assert_eq!(BlockFormat::Standard.order_number(&lines[..1], 0, 5), "");
    }

    #[test]
    fn test_standard_order_stops_on_first_line() {
        let lines = [
            "Air Waybill Number 111122223333 ACME CORP",
            "Refs 2024 3030",
            "PO 4242",
        ];
        assert_eq!(BlockFormat::Standard.order_number(&lines, 0, 5), "2024");
    }
}
