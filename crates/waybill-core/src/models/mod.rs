//! Data models for shipment records and configuration.

pub mod config;
pub mod shipment;
