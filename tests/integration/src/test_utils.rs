//! Shared fixtures for the integration tests

use zkcert_certificate::{CertificateContent, KycContent, ZkCertificate};
use zkcert_core::{logging, FieldElement, LoggingConfig};
use zkcert_crypto::{derive_key_from_signature, CryptoResult, KeyPair, SIGNATURE_LENGTH};

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = logging::init_with(&LoggingConfig {
        level: "debug".to_string(),
        json: false,
    });
}

/// Deterministic stand-in for a wallet's 65-byte signature.
pub fn wallet_signature(seed: u8) -> [u8; SIGNATURE_LENGTH] {
    let mut signature = [0u8; SIGNATURE_LENGTH];
    for (i, byte) in signature.iter_mut().enumerate() {
        *byte = seed.wrapping_mul(97).wrapping_add(i as u8).wrapping_mul(13) | 1;
    }
    signature
}

pub fn wallet_key(seed: u8) -> CryptoResult<KeyPair> {
    derive_key_from_signature(&wallet_signature(seed))
}

pub fn kyc_content() -> KycContent {
    KycContent {
        surname: "Muster".to_string(),
        forename: "Erika".to_string(),
        middlename: "Maria".to_string(),
        year_of_birth: 1964,
        month_of_birth: 8,
        day_of_birth: 12,
        verification_level: 2,
        expiration_date: 1_893_456_000,
        street_and_number: "Heidestrasse 17".to_string(),
        postcode: "51147".to_string(),
        town: "Köln".to_string(),
        region: "NRW".to_string(),
        country: "DEU".to_string(),
        citizenship: "DEU".to_string(),
        passport_id: "C01X00T47".to_string(),
    }
}

/// A zkKYC certificate for `holder`, signed by `provider`.
pub fn issue_kyc(holder: &KeyPair, provider: &KeyPair, salt: u64) -> anyhow::Result<ZkCertificate> {
    Ok(ZkCertificate::issue(
        CertificateContent::Kyc(kyc_content()),
        holder.holder_commitment()?,
        provider,
        FieldElement::from_u64(salt),
    )?)
}
