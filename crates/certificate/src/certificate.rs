//! zkCertificate assembly, signing and registration.
//!
//! The registry leaf commits to the content hash, the holder, the provider
//! and a random salt:
//!
//! ```text
//! leaf = poseidon(contentHash, holderCommitment, providerAx, providerAy, randomSalt)
//! ```
//!
//! Nothing else enters the leaf. The provider signature and the merkle proof
//! are attached to the certificate but never hashed into it.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroize;
use zkcert_core::FieldElement;
use zkcert_crypto::eddsa::{self, EddsaSignature};
use zkcert_crypto::{poseidon_hash, poseidon_hash_2, CurvePoint, KeyPair};
use zkcert_registry::{AccumulatorError, MerkleAccumulator, MerkleProof};

use crate::content::{CertificateContent, KycContent};
use crate::encoding::{encode_address, hash_string};
use crate::error::{CertificateError, CertificateResult};
use crate::standard::CertificateStandard;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderData {
    pub public_key: CurvePoint,
    pub signature: EddsaSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkCertificate {
    pub content: CertificateContent,
    pub content_hash: FieldElement,
    pub holder_commitment: FieldElement,
    pub provider: ProviderData,
    pub random_salt: FieldElement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkle_proof: Option<MerkleProof>,
}

/// The registry leaf for the given commitments.
pub fn leaf_hash(
    content_hash: FieldElement,
    holder_commitment: FieldElement,
    provider_public_key: &CurvePoint,
    random_salt: FieldElement,
) -> CertificateResult<FieldElement> {
    Ok(poseidon_hash(&[
        content_hash,
        holder_commitment,
        provider_public_key.x,
        provider_public_key.y,
        random_salt,
    ])?)
}

/// Message the provider signs: `poseidon(contentHash, holderCommitment)`.
pub fn provider_message(
    content_hash: FieldElement,
    holder_commitment: FieldElement,
) -> CertificateResult<FieldElement> {
    Ok(poseidon_hash_2(content_hash, holder_commitment)?)
}

/// Per-dApp identifier of a KYC'd person, stable across re-issued
/// certificates for the same person.
pub fn compute_human_id_hash(kyc: &KycContent, dapp_address: &str) -> CertificateResult<FieldElement> {
    Ok(poseidon_hash(&[
        hash_string(&kyc.surname)?,
        hash_string(&kyc.forename)?,
        hash_string(&kyc.middlename)?,
        FieldElement::from_u64(u64::from(kyc.year_of_birth)),
        FieldElement::from_u64(u64::from(kyc.month_of_birth)),
        FieldElement::from_u64(u64::from(kyc.day_of_birth)),
        hash_string(&kyc.passport_id)?,
        encode_address(dapp_address)?,
    ])?)
}

/// Uniform field element from 64 random bytes.
pub fn random_field<R: RngCore + CryptoRng>(rng: &mut R) -> FieldElement {
    let mut wide = [0u8; 64];
    rng.fill_bytes(&mut wide);
    let value = FieldElement::from_be_bytes_mod_order(&wide);
    wide.zeroize();
    value
}

impl ZkCertificate {
    /// Hash the content and sign it for the holder.
    pub fn issue(
        content: CertificateContent,
        holder_commitment: FieldElement,
        provider: &KeyPair,
        random_salt: FieldElement,
    ) -> CertificateResult<Self> {
        let content_hash = content.content_hash()?;
        let message = provider_message(content_hash, holder_commitment)?;
        let signature = eddsa::sign(provider, message)?;
        debug!(
            standard = %content.standard(),
            content_hash = %content_hash,
            "issued certificate"
        );
        Ok(Self {
            content,
            content_hash,
            holder_commitment,
            provider: ProviderData {
                public_key: provider.public_key(),
                signature,
            },
            random_salt,
            merkle_proof: None,
        })
    }

    /// [`ZkCertificate::issue`] with a fresh random salt.
    pub fn issue_with_rng<R: RngCore + CryptoRng>(
        content: CertificateContent,
        holder_commitment: FieldElement,
        provider: &KeyPair,
        rng: &mut R,
    ) -> CertificateResult<Self> {
        Self::issue(content, holder_commitment, provider, random_field(rng))
    }

    pub fn standard(&self) -> CertificateStandard {
        self.content.standard()
    }

    pub fn expiration_date(&self) -> u64 {
        self.content.expiration_date()
    }

    pub fn is_expired(&self, now_unix_secs: u64) -> bool {
        self.expiration_date() <= now_unix_secs
    }

    pub fn leaf_hash(&self) -> CertificateResult<FieldElement> {
        leaf_hash(
            self.content_hash,
            self.holder_commitment,
            &self.provider.public_key,
            self.random_salt,
        )
    }

    /// Check the stored content hash and the provider's signature over it.
    pub fn verify_provider_signature(&self) -> CertificateResult<()> {
        let computed = self.content.content_hash()?;
        if computed != self.content_hash {
            return Err(CertificateError::ContentHashMismatch {
                stored: self.content_hash,
                computed,
            });
        }
        let message = provider_message(self.content_hash, self.holder_commitment)?;
        if !eddsa::verify(&self.provider.public_key, message, &self.provider.signature) {
            return Err(CertificateError::InvalidProviderSignature);
        }
        Ok(())
    }

    /// Attach a proof, which must be for this certificate's leaf and fold
    /// to its own root.
    pub fn attach_proof(&mut self, proof: MerkleProof) -> CertificateResult<()> {
        let expected = self.leaf_hash()?;
        if proof.leaf != expected {
            return Err(CertificateError::LeafMismatch {
                expected,
                actual: proof.leaf,
            });
        }
        if !proof.verify() {
            return Err(AccumulatorError::InvalidProof.into());
        }
        self.merkle_proof = Some(proof);
        Ok(())
    }

    /// Append the leaf to `tree` and attach the resulting proof.
    pub fn register(&mut self, tree: &mut MerkleAccumulator) -> CertificateResult<u64> {
        let leaf = self.leaf_hash()?;
        let index = tree.insert_leaf(leaf)?;
        self.attach_proof(tree.create_proof(index)?)?;
        info!(leaf_index = index, leaf = %leaf, "registered certificate");
        Ok(index)
    }

    /// Regenerate the proof against the tree's current root.
    pub fn refresh_proof(&mut self, tree: &MerkleAccumulator) -> CertificateResult<()> {
        let index = tree.get_leaf_index(&self.leaf_hash()?)?;
        self.attach_proof(tree.create_proof(index)?)
    }

    pub fn proof(&self) -> CertificateResult<&MerkleProof> {
        self.merkle_proof
            .as_ref()
            .ok_or(CertificateError::MissingMerkleProof)
    }
}
