//! Single-line field rules shared by every block format.

use super::patterns::{AIR_WAYBILL, AMOUNT, SHIP_DATE, TOTAL_LINE};

/// Marker that identifies the air waybill line of a block.
pub const AIR_WAYBILL_MARKER: &str = "Air Waybill Number";

/// First `MM/DD/YYYY` date on the line, or empty.
pub fn ship_date(line: &str) -> String {
    SHIP_DATE
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First 12-digit run on the line, or empty.
pub fn air_waybill_number(line: &str) -> String {
    AIR_WAYBILL
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Total amount on a `Total ... 1,234.56` line, commas stripped.
///
/// Returns `None` when the line is not a total line. The amount is the
/// first two-decimal number anywhere on the line.
pub fn total_amount(line: &str) -> Option<String> {
    if !TOTAL_LINE.is_match(line) {
        return None;
    }
    AMOUNT.find(line).map(|m| m.as_str().replace(',', ""))
}

/// Last two whitespace-separated tokens joined by a space.
///
/// Empty when the line has fewer than two tokens.
pub fn last_two_tokens(line: &str) -> String {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [.., first, second] => format!("{} {}", first, second),
        _ => String::new(),
    }
}
