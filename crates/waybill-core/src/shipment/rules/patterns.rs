//! Common regex patterns for carrier invoice extraction.
//!
//! Digit classes are ASCII only so that every captured value parses as a
//! plain decimal number downstream.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Ship date as printed on the anchor line (MM/DD/YYYY)
    pub static ref SHIP_DATE: Regex = Regex::new(
        r"[0-9]{2}/[0-9]{2}/[0-9]{4}"
    ).unwrap();

    // Air waybill number: first 12 consecutive digits
    pub static ref AIR_WAYBILL: Regex = Regex::new(
        r"[0-9]{12}"
    ).unwrap();

    // Order number candidates
    pub static ref ORDER_DIGIT_RUN: Regex = Regex::new(
        r"[0-9]{4}"
    ).unwrap();

    pub static ref ORDER_TOKEN: Regex = Regex::new(
        r"\b[0-9]{4}\b"
    ).unwrap();

    // Digits belonging to a longer identifier or a date
    pub static ref ORDER_LINE_REJECT: Regex = Regex::new(
        r"[0-9]{5,}|/[0-9]{4}|[0-9]{4}/"
    ).unwrap();

    // Total amounts
    pub static ref TOTAL_LINE: Regex = Regex::new(
        r"(?i)\btotal\b.*[0-9]+\.[0-9]{2}"
    ).unwrap();

    pub static ref AMOUNT: Regex = Regex::new(
        r"[0-9]+(?:,[0-9]+)*\.[0-9]{2}"
    ).unwrap();
}
