//! Reading input documents into text.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, WaybillError};
use crate::models::config::PdfConfig;
use crate::pdf::text_of;

/// Read the text of an input document.
///
/// PDFs go through text extraction; `.txt` files are taken as an already
/// extracted dump. Empty text is returned as is and only logged, since
/// it simply contains no shipments.
pub fn read_document_text(path: &Path, config: &PdfConfig) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let size = fs::metadata(path)?.len();
    if size > config.max_file_size {
        return Err(WaybillError::FileTooLarge {
            path: path.display().to_string(),
            size,
            limit: config.max_file_size,
        });
    }

    let text = match extension.as_str() {
        "pdf" => text_of(&fs::read(path)?)?,
        "txt" => fs::read_to_string(path)?,
        _ => return Err(WaybillError::UnsupportedFormat(path.display().to_string())),
    };

    let text_len = text.trim().len();
    if text_len == 0 {
        warn!("No text found in {}", path.display());
    } else if text_len < config.min_text_length {
        warn!(
            "Only {} chars of text in {}, the document may be scanned",
            text_len,
            path.display()
        );
    } else {
        debug!("Read {} chars from {}", text.len(), path.display());
    }

    Ok(text)
}
