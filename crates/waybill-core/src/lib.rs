//! Core library for carrier invoice parsing.
//!
//! This crate provides:
//! - PDF text extraction (the upstream collaborator of the extractor)
//! - Shipment record extraction from carrier invoice text dumps
//! - Shipment data models and configuration

pub mod document;
pub mod error;
pub mod models;
pub mod pdf;
pub mod shipment;

pub use document::read_document_text;
pub use error::{ConfigError, PdfError, Result, WaybillError};
pub use models::config::WaybillConfig;
pub use models::shipment::ShipmentRecord;
pub use pdf::{PdfExtractor, PdfProcessor, text_of};
pub use shipment::{BlockFormat, ExtractionResult, ShipmentExtractor, ShipmentParser, extract};
