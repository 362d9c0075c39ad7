//! Sealed boxes: X25519 ephemeral-static key agreement with
//! ChaCha20-Poly1305.
//!
//! Used for portable exports of certificate material to a recipient's
//! storage key (see [`crate::keys::derive_encryption_key_from_signature`]).
//! Each box carries its own ephemeral public key and nonce; the AEAD key is
//! BLAKE3-derived from the X25519 shared secret and both public keys.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce as ChaCha20Nonce,
};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

/// Format version bound into the AEAD associated data.
pub const SEALED_BOX_VERSION: u8 = 1;

/// Nonce size for ChaCha20-Poly1305 (96 bits / 12 bytes).
pub const NONCE_SIZE: usize = 12;

const KEY_CONTEXT: &str = "zkCert 2024-06 sealed box key v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SealError {
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Wrong recipient key or tampered box
    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Unsupported sealed box version {0}")]
    UnsupportedVersion(u8),
}

pub type SealResult<T> = Result<T, SealError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedBox {
    pub version: u8,
    #[serde(with = "hex::serde")]
    pub ephemeral_public_key: [u8; 32],
    #[serde(with = "hex::serde")]
    pub nonce: [u8; NONCE_SIZE],
    #[serde(with = "hex::serde")]
    pub ciphertext: Vec<u8>,
}

fn derive_cipher(
    shared: &[u8; 32],
    ephemeral: &X25519PublicKey,
    recipient: &X25519PublicKey,
) -> ChaCha20Poly1305 {
    let mut hasher = blake3::Hasher::new_derive_key(KEY_CONTEXT);
    hasher.update(shared);
    hasher.update(ephemeral.as_bytes());
    hasher.update(recipient.as_bytes());
    let mut key_bytes: [u8; 32] = *hasher.finalize().as_bytes();
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key_bytes));
    key_bytes.zeroize();
    cipher
}

fn associated_data(version: u8, ephemeral: &[u8; 32]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(33);
    aad.push(version);
    aad.extend_from_slice(ephemeral);
    aad
}

/// Encrypt `plaintext` so that only the holder of `recipient`'s secret can
/// open it.
pub fn seal<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    recipient: &X25519PublicKey,
    rng: &mut R,
) -> SealResult<SealedBox> {
    let ephemeral_secret = EphemeralSecret::random_from_rng(&mut *rng);
    let ephemeral_public = X25519PublicKey::from(&ephemeral_secret);
    let shared = ephemeral_secret.diffie_hellman(recipient);
    let cipher = derive_cipher(shared.as_bytes(), &ephemeral_public, recipient);

    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);
    let aad = associated_data(SEALED_BOX_VERSION, ephemeral_public.as_bytes());
    let ciphertext = cipher
        .encrypt(
            ChaCha20Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|e| SealError::Encryption(e.to_string()))?;

    Ok(SealedBox {
        version: SEALED_BOX_VERSION,
        ephemeral_public_key: *ephemeral_public.as_bytes(),
        nonce,
        ciphertext,
    })
}

/// Decrypt a box with the recipient's static secret.
pub fn open(sealed: &SealedBox, recipient_secret: &StaticSecret) -> SealResult<Vec<u8>> {
    if sealed.version != SEALED_BOX_VERSION {
        return Err(SealError::UnsupportedVersion(sealed.version));
    }
    let ephemeral_public = X25519PublicKey::from(sealed.ephemeral_public_key);
    let recipient_public = X25519PublicKey::from(recipient_secret);
    let shared = recipient_secret.diffie_hellman(&ephemeral_public);
    let cipher = derive_cipher(shared.as_bytes(), &ephemeral_public, &recipient_public);

    let aad = associated_data(sealed.version, &sealed.ephemeral_public_key);
    cipher
        .decrypt(
            ChaCha20Nonce::from_slice(&sealed.nonce),
            Payload {
                msg: &sealed.ciphertext,
                aad: &aad,
            },
        )
        .map_err(|e| SealError::Decryption(e.to_string()))
}
