//! Encrypted certificate export and import.
//!
//! The certificate JSON is sealed to the holder's X25519 storage key (see
//! `zkcert_crypto::keys::derive_encryption_key_from_signature`). The holder
//! commitment stays in the clear so a wallet can tell which identity an
//! export belongs to before decrypting it.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zkcert_core::FieldElement;
use zkcert_crypto::sealed::{self, SealedBox};

use crate::certificate::ZkCertificate;
use crate::error::{CertificateError, CertificateResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedCertificate {
    pub holder_commitment: FieldElement,
    #[serde(flatten)]
    pub sealed: SealedBox,
}

pub fn encrypt_certificate<R: RngCore + CryptoRng>(
    certificate: &ZkCertificate,
    recipient: &X25519PublicKey,
    rng: &mut R,
) -> CertificateResult<EncryptedCertificate> {
    let plaintext = serde_json::to_vec(certificate)?;
    let sealed = sealed::seal(&plaintext, recipient, rng)?;
    debug!(
        holder_commitment = %certificate.holder_commitment,
        bytes = sealed.ciphertext.len(),
        "exported certificate"
    );
    Ok(EncryptedCertificate {
        holder_commitment: certificate.holder_commitment,
        sealed,
    })
}

/// Decrypt and parse an export. The clear holder commitment must match the
/// decrypted certificate.
pub fn decrypt_certificate(
    encrypted: &EncryptedCertificate,
    secret: &StaticSecret,
) -> CertificateResult<ZkCertificate> {
    let plaintext = sealed::open(&encrypted.sealed, secret)?;
    let certificate: ZkCertificate = serde_json::from_slice(&plaintext)?;
    if certificate.holder_commitment != encrypted.holder_commitment {
        return Err(CertificateError::HolderMismatch);
    }
    Ok(certificate)
}
