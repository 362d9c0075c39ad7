//! Cross-crate integration tests for the zkCert engine
//!
//! This test suite validates:
//! - Concrete registry and secret-sharing scenarios at production parameters
//! - Certificate lifecycle: key derivation, issuance, registration, export
//! - Investigation flow from package preparation to recovery

pub mod test_utils;

#[cfg(test)]
mod scenario_tests;

#[cfg(test)]
mod lifecycle_tests;

#[cfg(test)]
mod investigation_tests;
