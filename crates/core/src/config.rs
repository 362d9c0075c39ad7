//! Configuration management for zkCert hosts.
//!
//! Hosts (wallet extension, issuer backend, investigation tooling) load one
//! [`Config`] and hand the relevant section to each component. Every section
//! has defaults matching the on-chain registry deployment, so an empty TOML
//! document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Depth of the on-chain zkCertificate registry tree.
pub const DEFAULT_MERKLE_DEPTH: u32 = 32;

/// Largest depth supported by the accumulator (indices are `u64`, proofs are
/// consumed by circuits compiled for at most 32 levels).
pub const MAX_MERKLE_DEPTH: u32 = 32;

/// Leaves fetched per registry page during a remote rebuild.
pub const DEFAULT_SYNC_PAGE_SIZE: u64 = 10_000;

/// Message the wallet signs to derive the identity key.
///
/// Part of the external contract: changing a single byte changes every
/// derived key, so a new wording needs a new version tag.
pub const DEFAULT_KEY_DERIVATION_MESSAGE: &str = "zkCert identity key v1\n\nSign this message to derive your zkCertificate identity key. Only sign it on sites you trust to manage your zkCertificates.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub merkle: MerkleConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerkleConfig {
    /// Fixed tree depth; capacity is `2^depth` leaves.
    pub depth: u32,
    /// Maximum number of leaves requested from the registry per page.
    pub page_size: u64,
}

impl Default for MerkleConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_MERKLE_DEPTH,
            page_size: DEFAULT_SYNC_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub key_derivation_message: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            key_derivation_message: DEFAULT_KEY_DERIVATION_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.merkle.depth == 0 || self.merkle.depth > MAX_MERKLE_DEPTH {
            return Err(CoreError::Config(format!(
                "merkle.depth must be between 1 and {MAX_MERKLE_DEPTH}, got {}",
                self.merkle.depth
            )));
        }
        if self.merkle.page_size == 0 {
            return Err(CoreError::Config(
                "merkle.page_size must be positive".to_string(),
            ));
        }
        if self.identity.key_derivation_message.is_empty() {
            return Err(CoreError::Config(
                "identity.key_derivation_message must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(CoreError::Config(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
