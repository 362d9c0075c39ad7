//! Certificate error types

use thiserror::Error;
use zkcert_core::{FieldElement, FieldError};
use zkcert_crypto::{CryptoError, SealError, SharingError};
use zkcert_registry::AccumulatorError;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Registry error: {0}")]
    Accumulator(#[from] AccumulatorError),

    #[error("Secret sharing error: {0}")]
    Sharing(#[from] SharingError),

    #[error("Export error: {0}")]
    Seal(#[from] SealError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown certificate standard {0:?}")]
    UnknownStandard(String),

    /// Stored content hash does not match the content
    #[error("Content hash mismatch: stored {stored}, computed {computed}")]
    ContentHashMismatch {
        stored: FieldElement,
        computed: FieldElement,
    },

    #[error("Provider signature is invalid")]
    InvalidProviderSignature,

    /// Merkle proof is for a different leaf than this certificate
    #[error("Leaf mismatch: certificate {expected}, proof {actual}")]
    LeafMismatch {
        expected: FieldElement,
        actual: FieldElement,
    },

    #[error("Certificate has no merkle proof")]
    MissingMerkleProof,

    /// Exported holder commitment disagrees with the decrypted certificate
    #[error("Holder commitment mismatch")]
    HolderMismatch,

    #[error("Key is not one of the package's authorities")]
    UnknownAuthority,

    /// Decrypted share does not carry its own index; usually a wrong key
    #[error("Share {0} did not decrypt to a valid share")]
    ShareDecryptionFailed(u64),

    #[error("Insufficient shares: need {needed}, got {got}")]
    InsufficientShares { needed: usize, got: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for certificate operations.
pub type CertificateResult<T> = std::result::Result<T, CertificateError>;
