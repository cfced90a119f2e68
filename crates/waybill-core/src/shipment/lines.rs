//! Line normalization and addressing.

/// Literal that starts every shipment block.
pub const ANCHOR_MARKER: &str = "Ship Date";

/// Split text into trimmed, non-blank lines in document order.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether a normalized line opens a shipment block.
pub fn is_anchor(line: &str) -> bool {
    line.starts_with(ANCHOR_MARKER)
}

/// Lines `first..=last`, clamped to the end of the document.
pub fn window<'a, 'b>(lines: &'a [&'b str], first: usize, last: usize) -> &'a [&'b str] {
    let end = last.saturating_add(1).min(lines.len());
    if first >= end {
        return &[];
    }
    &lines[first..end]
}
