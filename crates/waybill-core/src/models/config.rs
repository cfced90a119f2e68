//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::shipment::rules::OrderOverride;

/// Main configuration for the waybill pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaybillConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Shipment extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest accepted input file in bytes.
    pub max_file_size: u64,

    /// Extracted text shorter than this is reported as suspicious.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size: 16 * 1024 * 1024,
            min_text_length: 1,
        }
    }
}

/// Shipment extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines after a `Ship Date` anchor searched for the air waybill line.
    pub awb_search_lines: usize,

    /// Lines after the air waybill line searched for a standard-format order number.
    pub order_search_lines: usize,

    /// Last line offset (from the air waybill line) searched for the total.
    pub total_search_lines: usize,

    /// Extra order number overrides, applied before the built-in ones.
    pub order_overrides: Vec<OrderOverride>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            awb_search_lines: 4,
            order_search_lines: 5,
            total_search_lines: 20,
            order_overrides: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (json, csv, tsv, text).
    pub format: String,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

impl WaybillConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
