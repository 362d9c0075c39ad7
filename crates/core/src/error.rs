//! Core error types

use thiserror::Error;

/// Errors raised when a value cannot be represented as a field element.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Value is not strictly below the field modulus
    #[error("Field overflow: {value} is not below the BN254 scalar field modulus")]
    FieldOverflow { value: String },

    /// Value is not in the expected textual encoding
    #[error("Invalid field encoding: {0}")]
    InvalidEncoding(String),

    /// Fixed-width encoding has the wrong length
    #[error("Invalid field length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Core error type for zkCert
#[derive(Debug, Error)]
pub enum CoreError {
    /// Field conversion error
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Configuration rejected during validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Logging subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
