//! Error types for the quote engine
//!
//! Derivation itself never fails; these cover configuration I/O and naming
//! mistakes in interactive edits.

use thiserror::Error;

/// Result type for quote engine operations
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Errors that can occur outside the (total) derivation pipeline
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown quote field: {0}")]
    UnknownField(String),

    #[error("Field {0} does not take a number")]
    NotNumeric(String),

    #[error("Invalid pricing mode: {0} (expected hourly or fixed)")]
    InvalidMode(String),

    #[error("Invalid toggle value: {0} (expected on or off)")]
    InvalidToggle(String),
}
