//! Error types for the waybill-core library.
//!
//! Shipment extraction itself never fails (unresolved fields degrade to
//! empty strings); these types cover the collaborators around it.

use thiserror::Error;

/// Main error type for the waybill library.
#[derive(Error, Debug)]
pub enum WaybillError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file exceeds the configured size limit.
    #[error("File too large: {path} is {size} bytes (limit {limit} bytes)")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    /// Input is neither a PDF nor a text dump.
    #[error("Invalid file format: {0}")]
    UnsupportedFormat(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the config schema.
    #[error("invalid configuration: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for the waybill library.
pub type Result<T> = std::result::Result<T, WaybillError>;
