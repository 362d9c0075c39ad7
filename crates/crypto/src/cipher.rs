//! Field-native symmetric cipher.
//!
//! A pair of field elements is encrypted with the MiMC Feistel permutation
//! under the round key `k = poseidon(shared_secret, nonce)`. The construction
//! is the one the investigation circuit proves, so ciphertexts produced here
//! can be checked in-circuit against the plaintext shares.
//!
//! There is no authentication tag. Decrypting with the wrong key yields
//! unrelated field elements; callers validate the structure of what they
//! decrypt (the byte helpers below do this for their own packing).

use serde::{Deserialize, Serialize};
use zkcert_core::{FieldElement, FIELD_BYTES};

use crate::error::{CryptoError, CryptoResult};
use crate::keys::SharedSecret;
use crate::mimc::{mimc_feistel, mimc_feistel_inverse};
use crate::poseidon::poseidon_hash_2;

/// Bytes carried by one field element (always below the modulus).
pub const BYTES_PER_CHUNK: usize = 31;

/// Largest input to [`encrypt_bytes`]; one byte of the two chunks holds the
/// length.
pub const MAX_PAYLOAD_BYTES: usize = 2 * BYTES_PER_CHUNK - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    pub cipher_pair: [FieldElement; 2],
    pub nonce: FieldElement,
}

/// `poseidon(shared_secret, nonce)`
pub fn derive_round_key(key: &SharedSecret, nonce: FieldElement) -> CryptoResult<FieldElement> {
    poseidon_hash_2(key.as_field(), nonce)
}

pub fn encrypt(
    left: FieldElement,
    right: FieldElement,
    key: &SharedSecret,
    nonce: FieldElement,
) -> CryptoResult<EncryptedPayload> {
    let round_key = derive_round_key(key, nonce)?;
    let (xl, xr) = mimc_feistel(left, right, round_key);
    Ok(EncryptedPayload {
        cipher_pair: [xl, xr],
        nonce,
    })
}

pub fn decrypt(
    payload: &EncryptedPayload,
    key: &SharedSecret,
) -> CryptoResult<(FieldElement, FieldElement)> {
    let round_key = derive_round_key(key, payload.nonce)?;
    let [xl, xr] = payload.cipher_pair;
    Ok(mimc_feistel_inverse(xl, xr, round_key))
}

fn chunk_to_field(chunk: &[u8]) -> CryptoResult<FieldElement> {
    let mut bytes = [0u8; FIELD_BYTES];
    bytes[FIELD_BYTES - BYTES_PER_CHUNK..].copy_from_slice(chunk);
    Ok(FieldElement::from_be_bytes(&bytes)?)
}

fn field_to_chunk(value: FieldElement) -> CryptoResult<[u8; BYTES_PER_CHUNK]> {
    let bytes = value.to_be_bytes();
    if bytes[0] != 0 {
        return Err(CryptoError::InvalidPayload(
            "chunk exceeds 31 bytes".to_string(),
        ));
    }
    let mut chunk = [0u8; BYTES_PER_CHUNK];
    chunk.copy_from_slice(&bytes[1..]);
    Ok(chunk)
}

/// Encrypt up to [`MAX_PAYLOAD_BYTES`] of free-form data.
///
/// Layout before encryption: `len || data || zero padding`, 62 bytes split
/// into two 31-byte big-endian chunks.
pub fn encrypt_bytes(
    data: &[u8],
    key: &SharedSecret,
    nonce: FieldElement,
) -> CryptoResult<EncryptedPayload> {
    if data.len() > MAX_PAYLOAD_BYTES {
        return Err(CryptoError::InvalidPayload(format!(
            "payload of {} bytes exceeds {MAX_PAYLOAD_BYTES}",
            data.len()
        )));
    }
    let mut packed = [0u8; 2 * BYTES_PER_CHUNK];
    packed[0] = data.len() as u8;
    packed[1..=data.len()].copy_from_slice(data);
    let left = chunk_to_field(&packed[..BYTES_PER_CHUNK])?;
    let right = chunk_to_field(&packed[BYTES_PER_CHUNK..])?;
    encrypt(left, right, key, nonce)
}

/// Inverse of [`encrypt_bytes`]. A wrong key is reported as
/// [`CryptoError::InvalidPayload`] whenever the result does not unpack.
pub fn decrypt_bytes(payload: &EncryptedPayload, key: &SharedSecret) -> CryptoResult<Vec<u8>> {
    let (left, right) = decrypt(payload, key)?;
    let mut packed = [0u8; 2 * BYTES_PER_CHUNK];
    packed[..BYTES_PER_CHUNK].copy_from_slice(&field_to_chunk(left)?);
    packed[BYTES_PER_CHUNK..].copy_from_slice(&field_to_chunk(right)?);

    let len = packed[0] as usize;
    if len > MAX_PAYLOAD_BYTES {
        return Err(CryptoError::InvalidPayload(format!(
            "declared length {len} exceeds {MAX_PAYLOAD_BYTES}"
        )));
    }
    if packed[len + 1..].iter().any(|&b| b != 0) {
        return Err(CryptoError::InvalidPayload(
            "non-zero padding".to_string(),
        ));
    }
    Ok(packed[1..=len].to_vec())
}
