//! Investigation packages: threshold disclosure of an identity-linking
//! secret to a set of investigation authorities.
//!
//! The holder splits the secret with Shamir and encrypts share `i` for
//! authority `i` with the field cipher, under the ECDH secret between a
//! one-off holder key and the authority's public key. Only the one-off public
//! key is published. Any `threshold` authorities can decrypt their shares
//! and recover the secret; fewer learn nothing.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zkcert_core::FieldElement;
use zkcert_crypto::cipher::{self, EncryptedPayload};
use zkcert_crypto::{reconstruct, CurvePoint, KeyPair, ShamirShare, SharingPolynomial};

use crate::certificate::{random_field, ZkCertificate};
use crate::error::{CertificateError, CertificateResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedShare {
    pub authority_index: u64,
    pub authority_public_key: CurvePoint,
    /// `cipherPair` encrypts `(share value, authority index)`.
    pub payload: EncryptedPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationPackage {
    pub holder_public_key: CurvePoint,
    pub threshold: usize,
    pub shares: Vec<EncryptedShare>,
}

/// Split `secret` among `authorities` (share `i + 1` for `authorities[i]`).
pub fn prepare<R: RngCore + CryptoRng>(
    secret: FieldElement,
    authorities: &[CurvePoint],
    threshold: usize,
    rng: &mut R,
) -> CertificateResult<InvestigationPackage> {
    if threshold == 0 || threshold > authorities.len() {
        return Err(zkcert_crypto::SharingError::InvalidThreshold {
            threshold,
            share_count: authorities.len(),
        }
        .into());
    }
    for authority in authorities {
        authority.validate()?;
    }

    let one_off = KeyPair::generate(rng);
    let polynomial = SharingPolynomial::random(secret, threshold, rng)?;
    let shares = polynomial
        .shares(authorities.len())
        .into_iter()
        .zip(authorities)
        .map(|(share, authority)| -> CertificateResult<EncryptedShare> {
            let shared = one_off.ecdh(authority)?;
            let nonce = random_field(rng);
            let payload = cipher::encrypt(
                share.value,
                FieldElement::from_u64(share.index),
                &shared,
                nonce,
            )?;
            Ok(EncryptedShare {
                authority_index: share.index,
                authority_public_key: *authority,
                payload,
            })
        })
        .collect::<CertificateResult<Vec<_>>>()?;

    info!(
        authorities = authorities.len(),
        threshold, "prepared investigation package"
    );
    Ok(InvestigationPackage {
        holder_public_key: one_off.public_key(),
        threshold,
        shares,
    })
}

/// Package disclosing the certificate's holder commitment.
pub fn prepare_for_certificate<R: RngCore + CryptoRng>(
    certificate: &ZkCertificate,
    authorities: &[CurvePoint],
    threshold: usize,
    rng: &mut R,
) -> CertificateResult<InvestigationPackage> {
    prepare(certificate.holder_commitment, authorities, threshold, rng)
}

/// Decrypt the share addressed to `authority`.
pub fn open_share(
    package: &InvestigationPackage,
    authority: &KeyPair,
) -> CertificateResult<ShamirShare> {
    let public_key = authority.public_key();
    let encrypted = package
        .shares
        .iter()
        .find(|share| share.authority_public_key == public_key)
        .ok_or(CertificateError::UnknownAuthority)?;

    let shared = authority.ecdh(&package.holder_public_key)?;
    let (value, index) = cipher::decrypt(&encrypted.payload, &shared)?;
    if index != FieldElement::from_u64(encrypted.authority_index) {
        return Err(CertificateError::ShareDecryptionFailed(
            encrypted.authority_index,
        ));
    }
    debug!(authority_index = encrypted.authority_index, "opened investigation share");
    Ok(ShamirShare {
        index: encrypted.authority_index,
        value,
    })
}

/// Recombine decrypted shares. Requires at least `threshold` of them.
pub fn recover(
    package: &InvestigationPackage,
    shares: &[ShamirShare],
) -> CertificateResult<FieldElement> {
    if shares.len() < package.threshold {
        return Err(CertificateError::InsufficientShares {
            needed: package.threshold,
            got: shares.len(),
        });
    }
    Ok(reconstruct(package.threshold, shares)?)
}
