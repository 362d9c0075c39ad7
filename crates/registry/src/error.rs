//! Registry error types

use thiserror::Error;
use zkcert_core::FieldElement;
use zkcert_crypto::CryptoError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccumulatorError {
    #[error("Invalid tree depth {depth}: must be between 1 and {max}")]
    InvalidDepth { depth: u32, max: u32 },

    /// The batch would exceed `2^depth` leaves; nothing was inserted
    #[error("Tree full: {requested} leaves requested, {available} slots left")]
    TreeFull { requested: u64, available: u64 },

    #[error("Leaf index {index} out of range (next free index {next_index})")]
    IndexOutOfRange { index: u64, next_index: u64 },

    #[error("Leaf {0} not found")]
    LeafNotFound(FieldElement),

    /// Proof does not fold to the root it claims
    #[error("Invalid proof")]
    InvalidProof,

    /// Proof is internally consistent but the registry root has moved on
    #[error("Stale proof: proof root {proof_root}, registry root {current_root}")]
    StaleProof {
        proof_root: FieldElement,
        current_root: FieldElement,
    },

    #[error("Registry fetch failed for leaves [{from}, {to}): {reason}")]
    RegistryFetchFailed { from: u64, to: u64, reason: String },

    /// Rebuilt tree disagrees with the registry
    #[error("Root mismatch: local {local}, registry {remote}")]
    RootMismatch {
        local: FieldElement,
        remote: FieldElement,
    },

    #[error("Slot {0} is not revoked")]
    SlotNotRevoked(u64),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl AccumulatorError {
    /// Errors a caller can resolve by refreshing state and trying again:
    /// regenerate the proof, or resume the rebuild.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AccumulatorError::StaleProof { .. } | AccumulatorError::RegistryFetchFailed { .. }
        )
    }
}

/// Failure reported by a [`crate::sync::LeafRegistry`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid registry response: {0}")]
    InvalidResponse(String),
}

/// Result type for accumulator operations.
pub type AccumulatorResult<T> = std::result::Result<T, AccumulatorError>;
