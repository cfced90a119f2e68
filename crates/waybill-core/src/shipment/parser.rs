//! Line-anchored shipment block parser.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::models::config::ExtractionConfig;
use crate::models::shipment::ShipmentRecord;

use super::ShipmentExtractor;
use super::lines::{is_anchor, normalize_lines, window};
use super::rules::{
    AIR_WAYBILL_MARKER, BlockFormat, OrderOverride, air_waybill_number, apply_order_overrides,
    ship_date, total_amount,
};

/// Result of extracting one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Emitted records, in anchor order.
    pub records: Vec<ShipmentRecord>,
    /// Layout of each emitted record's block, parallel to `records`.
    pub formats: Vec<BlockFormat>,
    /// Number of `Ship Date` anchors seen.
    pub anchors: usize,
    /// One entry per anchor that produced no record.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Number of emitted records using the given layout.
    pub fn count_format(&self, format: BlockFormat) -> usize {
        self.formats.iter().filter(|f| **f == format).count()
    }
}

/// Why an anchor produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no \"Air Waybill Number\" line within {0} lines")]
    NoWaybillLine(usize),

    #[error("air waybill line has no 12-digit number")]
    MissingWaybillNumber,

    #[error("no total amount within {0} lines of the air waybill line")]
    MissingTotal(usize),
}

/// Shipment parser over normalized document lines.
#[derive(Debug, Clone)]
pub struct ShipmentParser {
    /// Anchor look-ahead for the air waybill line.
    awb_search_lines: usize,
    /// Air waybill look-ahead for a standard-layout order number.
    order_search_lines: usize,
    /// Last offset from the air waybill line searched for the total.
    total_search_lines: usize,
    /// Configured overrides, applied before the built-in ones.
    order_overrides: Vec<OrderOverride>,
}

impl ShipmentParser {
    /// Create a parser with the default search windows.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from the extraction config section.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            awb_search_lines: config.awb_search_lines,
            order_search_lines: config.order_search_lines,
            total_search_lines: config.total_search_lines,
            order_overrides: config.order_overrides.clone(),
        }
    }

    /// Set the air waybill look-ahead.
    pub fn with_awb_search_lines(mut self, lines: usize) -> Self {
        self.awb_search_lines = lines;
        self
    }

    /// Set the standard-layout order number look-ahead.
    pub fn with_order_search_lines(mut self, lines: usize) -> Self {
        self.order_search_lines = lines;
        self
    }

    /// Set the total amount look-ahead.
    pub fn with_total_search_lines(mut self, lines: usize) -> Self {
        self.total_search_lines = lines;
        self
    }

    /// Add an order number override.
    pub fn with_order_override(mut self, rule: OrderOverride) -> Self {
        self.order_overrides.push(rule);
        self
    }

    /// Resolve the block opened by the anchor at `lines[anchor_idx]`.
    fn parse_block(
        &self,
        lines: &[&str],
        anchor_idx: usize,
    ) -> Result<(ShipmentRecord, BlockFormat), SkipReason> {
        let date = ship_date(lines[anchor_idx]);

        let awb_idx = window(
            lines,
            anchor_idx + 1,
            anchor_idx.saturating_add(self.awb_search_lines),
        )
        .iter()
        .position(|line| line.contains(AIR_WAYBILL_MARKER))
        .map(|offset| anchor_idx + 1 + offset)
        .ok_or(SkipReason::NoWaybillLine(self.awb_search_lines))?;

        let awb_line = lines[awb_idx];
        let air_waybill_number = air_waybill_number(awb_line);
        if air_waybill_number.is_empty() {
            return Err(SkipReason::MissingWaybillNumber);
        }

        let customer_line = awb_idx.checked_sub(1).map(|idx| lines[idx]);
        let format = customer_line
            .map(BlockFormat::classify)
            .unwrap_or_default();
        trace!("Block at line {} uses {} layout", anchor_idx, format.label());

        let customer_name = format.customer_name(customer_line, awb_line);
        let order_number = format.order_number(lines, awb_idx, self.order_search_lines);
        let order_number =
            apply_order_overrides(&customer_name, order_number, &self.order_overrides);

        let total_amount = window(
            lines,
            awb_idx + 2,
            awb_idx.saturating_add(self.total_search_lines),
        )
        .iter()
        .copied()
        .find_map(total_amount)
        .ok_or(SkipReason::MissingTotal(self.total_search_lines))?;

        Ok((
            ShipmentRecord {
                date,
                air_waybill_number,
                customer_name,
                order_number,
                total_amount,
            },
            format,
        ))
    }
}

impl Default for ShipmentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentExtractor for ShipmentParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let lines = normalize_lines(text);
        let mut result = ExtractionResult::default();

        debug!("Parsing {} lines ({} chars)", lines.len(), text.len());

        for (idx, line) in lines.iter().enumerate() {
            if !is_anchor(line) {
                continue;
            }
            result.anchors += 1;

            match self.parse_block(&lines, idx) {
                Ok((record, format)) => {
                    debug!(
                        "Line {}: shipment {} ({}) total {}",
                        idx,
                        record.air_waybill_number,
                        format.label(),
                        record.total_amount
                    );
                    result.records.push(record);
                    result.formats.push(format);
                }
                Err(reason) => {
                    debug!("Line {}: skipped anchor: {}", idx, reason);
                    result.warnings.push(format!("Ship Date at line {}: {}", idx + 1, reason));
                }
            }
        }

        result.processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} shipments from {} anchors",
            result.records.len(),
            result.anchors
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::extract;
    use pretty_assertions::assert_eq;

    fn record(
        date: &str,
        awb: &str,
        customer: &str,
        order: &str,
        total: &str,
    ) -> ShipmentRecord {
        ShipmentRecord {
            date: date.to_string(),
            air_waybill_number: awb.to_string(),
            customer_name: customer.to_string(),
            order_number: order.to_string(),
            total_amount: total.to_string(),
        }
    }

    const TENDERED: &str = "
        Ship Date 04/17/2025
        Service Type FedEx International Priority
        Tendered Date 04/17/2025 BEN VIC VIC
        Air Waybill Number 123456789012 1234
        Package Details
        Total Due 1,234.56
    ";

    const CUSTOMS: &str = "
        Ship Date 03/22/2025 Invoice 555
        Customs Entry Date 03/22/2025 DARIA BENJAMIN ATTARD
        Air Waybill Number 987654321098 4321
        Shipment details
        Total Charges 56.78
    ";

    const STANDARD: &str = "
        Ship Date 05/01/2025
        Air Waybill Number 111122223333 ACME CORP
        Reference INV1234567 5555
        Dept 06/15/2025 7777
        PO 4242 extra 1234
        Total Amount Due 2,500.00
    ";

    #[test]
    fn test_no_anchor() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t\n").is_empty());
        assert!(extract("Air Waybill Number 123456789012\nTotal 1.00").is_empty());
    }

    #[test]
    fn test_tendered_date_block() {
        assert_eq!(
            extract(TENDERED),
            vec![record("04/17/2025", "123456789012", "VIC VIC", "1234", "1234.56")]
        );
    }

    #[test]
    fn test_tendered_date_override() {
        let text = TENDERED.replace("BEN VIC VIC", "DARIA BENJAMIN ATTARD");
        assert_eq!(
            extract(&text),
            vec![record("04/17/2025", "123456789012", "BENJAMIN ATTARD", "", "1234.56")]
        );
    }

    #[test]
    fn test_customs_entry_date_block() {
        assert_eq!(
            extract(CUSTOMS),
            vec![record("03/22/2025", "987654321098", "BENJAMIN ATTARD", "", "56.78")]
        );

        let text = CUSTOMS.replace("DARIA BENJAMIN ATTARD", "JOHN SMITH");
        assert_eq!(
            extract(&text),
            vec![record("03/22/2025", "987654321098", "JOHN SMITH", "4321", "56.78")]
        );
    }

    #[test]
    fn test_standard_block() {
        let result = ShipmentParser::new().parse(STANDARD);
        assert_eq!(
            result.records,
            vec![record("05/01/2025", "111122223333", "ACME CORP", "4242", "2500.00")]
        );
        assert_eq!(result.formats, vec![BlockFormat::Standard]);
        assert_eq!(result.anchors, 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_standard_rejects_long_digit_runs() {
        let text = "
            Ship Date 05/01/2025
            Air Waybill Number 111122223333 ACME CORP
            Reference INV1234567 5555
            PO 8080
            Total 10.00
        ";
        assert_eq!(extract(text)[0].order_number, "8080");
    }

    #[test]
    fn test_missing_total() {
        let text = TENDERED.replace("Total Due 1,234.56", "Balance 1,234.56");
        let result = ShipmentParser::new().parse(&text);
        assert!(result.records.is_empty());
        assert_eq!(result.anchors, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("no total amount"));
    }

    #[test]
    fn test_total_window_starts_two_lines_after_waybill() {
        let text = "
            Ship Date 01/02/2025
            Air Waybill Number 123456789012 A B
            Total 10.00
        ";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_total_window_end_is_inclusive() {
        let filler = "filler\n".repeat(19);

        // awb at line 1, total at line 21 = awb + 20
        let text = format!(
            "Ship Date 01/02/2025\nAir Waybill Number 123456789012 A B\n{}Total 10.00\n",
            filler
        );
        assert_eq!(extract(&text).len(), 1);

        let text = format!(
            "Ship Date 01/02/2025\nAir Waybill Number 123456789012 A B\n{}filler\nTotal 10.00\n",
            filler
        );
        assert!(extract(&text).is_empty());
    }

    #[test]
    fn test_waybill_window() {
        let text = "
            Ship Date 01/02/2025
            one
            two
            three
            Air Waybill Number 123456789012 A B
            x
            Total 1.00
        ";
        assert_eq!(extract(text).len(), 1);

        let text = text.replace("three", "three\nfour");
        let result = ShipmentParser::new().parse(&text);
        assert!(result.records.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Air Waybill Number"));
    }

    #[test]
    fn test_nearest_waybill_line_wins() {
        let text = "
            Ship Date 01/02/2025
            Air Waybill Number 111111111111 NEAR ONE
            Air Waybill Number 222222222222 FAR TWO
            x
            Total 1.00
        ";
        let records = extract(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].air_waybill_number, "111111111111");
        assert_eq!(records[0].customer_name, "NEAR ONE");
    }

    #[test]
    fn test_short_waybill_is_dropped() {
        let text = TENDERED.replace("123456789012", "12345678901");
        let result = ShipmentParser::new().parse(&text);
        assert!(result.records.is_empty());
        assert!(result.warnings[0].contains("12-digit"));
    }

    #[test]
    fn test_missing_date_keeps_record() {
        let text = TENDERED.replace("Ship Date 04/17/2025", "Ship Date");
        let records = extract(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "");
    }

    #[test]
    fn test_one_bad_anchor_does_not_stop_others() {
        let text = format!("{}\nShip Date 02/02/2025\nno waybill here\n", STANDARD);
        let result = ShipmentParser::new().parse(&text);
        assert_eq!(result.anchors, 2);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].air_waybill_number, "111122223333");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Ship Date at line 7:"));
    }

    #[test]
    fn test_document_order_and_idempotence() {
        let text = format!("{}\n{}\n{}", CUSTOMS, STANDARD, TENDERED);
        let records = extract(&text);
        let awbs: Vec<&str> = records
            .iter()
            .map(|r| r.air_waybill_number.as_str())
            .collect();
        assert_eq!(awbs, vec!["987654321098", "111122223333", "123456789012"]);
        assert_eq!(extract(&text), records);
    }

    #[test]
    fn test_invariants_hold_on_odd_input() {
        let inputs = [
            "Ship Date",
            "Ship Date\nAir Waybill Number",
            "Ship Date\nAir Waybill Number 123456789012\n\n\nTotal 1.00",
            "Ship Date 99/99/9999\r\nAir Waybill Number 000000000000 X Y\r\nx\r\nTOTAL 0.00",
            "Ship Date ١٢/١٢/٢٠٢٥\nAir Waybill Number ١٢٣٤٥٦٧٨٩٠١٢\nx\nTotal ١.٠٠",
        ];

        for input in inputs {
            for rec in extract(input) {
                assert_eq!(rec.air_waybill_number.len(), 12);
                assert!(rec.air_waybill_number.bytes().all(|b| b.is_ascii_digit()));
                assert!(!rec.total_amount.is_empty());
                if rec.customer_name == "BENJAMIN ATTARD" {
                    assert_eq!(rec.order_number, "");
                }
            }
        }

        assert_eq!(
            extract(inputs[3]),
            vec![record("99/99/9999", "000000000000", "X Y", "", "0.00")]
        );
    }

    #[test]
    fn test_total_may_come_from_next_block() {
        let text = "
            Ship Date 01/02/2025
            Air Waybill Number 123456789012 A B
            x
            Ship Date 01/03/2025
            Air Waybill Number 210987654321 C D
            y
            Total 5.00
        ";
        let records = extract(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].total_amount, "5.00");
        assert_eq!(records[1].total_amount, "5.00");
    }

    #[test]
    fn test_custom_windows_and_overrides() {
        let text = TENDERED.replace("Total Due", "Notes\nTotal Due");
        let parser = ShipmentParser::new()
            .with_total_search_lines(2)
            .with_order_override(OrderOverride::new("VIC VIC", "0007"));
        assert!(parser.extract(&text).is_empty());

        let parser = parser.with_total_search_lines(3);
        assert_eq!(parser.extract(&text)[0].order_number, "0007");

        let parser = ShipmentParser::new().with_awb_search_lines(2);
        assert!(parser.extract(TENDERED).is_empty());

        let parser = ShipmentParser::new().with_order_search_lines(2);
        assert_eq!(parser.extract(STANDARD)[0].order_number, "");
    }
}
