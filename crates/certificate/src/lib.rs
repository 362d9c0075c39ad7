//! zkCertificate assembly on top of the zkCert crypto and registry crates.
//!
//! - [`standard`] / [`content`]: typed content per certificate standard
//! - [`certificate`]: issuance, provider signatures, leaf hashing, registration
//! - [`export`]: encrypted portable exports
//! - [`investigation`]: threshold disclosure packages for authorities
//! - [`inputs`]: circuit input assembly

pub mod certificate;
pub mod content;
pub mod encoding;
pub mod error;
pub mod export;
pub mod inputs;
pub mod investigation;
pub mod standard;

pub use certificate::{
    compute_human_id_hash, leaf_hash, provider_message, ProviderData, ZkCertificate,
};
pub use content::{CertificateContent, KycContent, XAccountContent};
pub use encoding::hash_string;
pub use error::{CertificateError, CertificateResult};
pub use export::{decrypt_certificate, encrypt_certificate, EncryptedCertificate};
pub use inputs::{kyc_inputs, ownership_inputs, CircuitInputs, InputValue};
pub use investigation::{InvestigationPackage, EncryptedShare};
pub use standard::CertificateStandard;
