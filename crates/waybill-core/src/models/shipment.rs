//! Shipment record extracted from a carrier invoice.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date layout of the `date` field.
pub const SHIP_DATE_FORMAT: &str = "%m/%d/%Y";

/// One shipment block resolved from a carrier invoice.
///
/// All fields are kept as strings so that leading zeros and the exact
/// document formatting survive serialization. An unresolved optional
/// field is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Ship date as `MM/DD/YYYY`, or empty.
    pub date: String,

    /// Air waybill number, always 12 digits.
    pub air_waybill_number: String,

    /// Customer name derived from the block layout.
    pub customer_name: String,

    /// Four digit order number, or empty.
    pub order_number: String,

    /// Total amount with two fractional digits and no thousands separators.
    pub total_amount: String,
}

impl ShipmentRecord {
    /// Parse the ship date, if present and a real calendar date.
    pub fn ship_date(&self) -> Option<NaiveDate> {
        if self.date.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(&self.date, SHIP_DATE_FORMAT).ok()
    }

    /// Parse the total amount.
    pub fn total(&self) -> Option<Decimal> {
        Decimal::from_str(&self.total_amount).ok()
    }

    /// Check the record for values that look wrong.
    ///
    /// Extraction never rejects these; this is for reporting only.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.air_waybill_number.len() != 12
            || !self.air_waybill_number.bytes().all(|b| b.is_ascii_digit())
        {
            issues.push(format!(
                "Air waybill number {:?} is not 12 digits",
                self.air_waybill_number
            ));
        }

        if self.date.is_empty() {
            issues.push(format!("{}: missing ship date", self.air_waybill_number));
        } else if self.ship_date().is_none() {
            issues.push(format!(
                "{}: ship date {} is not a valid date",
                self.air_waybill_number, self.date
            ));
        }

        if self.customer_name.is_empty() {
            issues.push(format!("{}: missing customer name", self.air_waybill_number));
        }

        if self.total().is_none() {
            issues.push(format!(
                "{}: total amount {:?} is not a decimal",
                self.air_waybill_number, self.total_amount
            ));
        }

        issues
    }
}

/// Sum the parsable total amounts of a set of records.
pub fn sum_totals(records: &[ShipmentRecord]) -> Decimal {
    records.iter().filter_map(ShipmentRecord::total).sum()
}
