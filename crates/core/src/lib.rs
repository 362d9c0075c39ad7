//! Core types for the zkCert engine.
//!
//! This crate provides the canonical field element shared by every other
//! crate, along with the ambient configuration, logging and error types.

pub mod config;
pub mod error;
pub mod field;
pub mod logging;

pub use config::{
    Config, IdentityConfig, LoggingConfig, MerkleConfig, DEFAULT_KEY_DERIVATION_MESSAGE,
    DEFAULT_MERKLE_DEPTH, DEFAULT_SYNC_PAGE_SIZE, MAX_MERKLE_DEPTH,
};
pub use error::{CoreError, CoreResult, FieldError};
pub use field::{FieldElement, FIELD_BYTES, MODULUS_DECIMAL};
