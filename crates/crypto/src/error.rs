//! Crypto error types

use thiserror::Error;
use zkcert_core::FieldError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Input could not be represented as a field element
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Wallet signature has the wrong shape or derives a degenerate key
    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// Counterparty point is off-curve, the identity, or outside the subgroup
    #[error("Invalid curve point: {0}")]
    InvalidCurvePoint(String),

    #[error("Hash input must contain at least one element")]
    EmptyHashInput,

    /// Poseidon parameterisation failure
    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// Decrypted or imported payload does not have the expected structure
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;
