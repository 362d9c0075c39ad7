//! Identity key derivation and Diffie-Hellman over Baby Jubjub.
//!
//! A holder's identity key is never generated or stored by this crate. The
//! wallet signs [`KEY_DERIVATION_MESSAGE`] and the 65-byte signature is
//! reduced into a Baby Jubjub scalar, so the same wallet always recovers the
//! same key. Key pairs are plain values handed to the operations that need
//! them.

use std::fmt;

use ark_ff::{PrimeField, Zero};
use rand::{CryptoRng, RngCore};
use tracing::debug;
use x25519_dalek::StaticSecret;
use zeroize::Zeroize;
use zkcert_core::FieldElement;

use crate::babyjub::{self, CurvePoint, Scalar};
use crate::error::{CryptoError, CryptoResult};
use crate::poseidon::poseidon_hash_2;

/// Versioned message signed by the wallet to derive the identity key.
pub use zkcert_core::DEFAULT_KEY_DERIVATION_MESSAGE as KEY_DERIVATION_MESSAGE;

/// `r || s || v`
pub const SIGNATURE_LENGTH: usize = 65;

const ENCRYPTION_KEY_CONTEXT: &str = "zkCert 2024-06 holder storage encryption key v1";

/// Identity key pair. The private scalar is zeroized on drop and is never
/// serialized.
pub struct KeyPair {
    private_scalar: Scalar,
    public_key: CurvePoint,
}

impl KeyPair {
    /// Wrap a private scalar, rejecting zero.
    pub fn from_private_scalar(private_scalar: Scalar) -> CryptoResult<Self> {
        if private_scalar.is_zero() {
            return Err(CryptoError::InvalidScalar(
                "private scalar must be non-zero".to_string(),
            ));
        }
        let public_key = babyjub::mul_base(&private_scalar);
        Ok(Self {
            private_scalar,
            public_key,
        })
    }

    /// Fresh random key pair, used for one-off keys such as the holder's
    /// investigation key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut wide = [0u8; 64];
            rng.fill_bytes(&mut wide);
            let scalar = Scalar::from_le_bytes_mod_order(&wide);
            wide.zeroize();
            if let Ok(pair) = Self::from_private_scalar(scalar) {
                return pair;
            }
        }
    }

    pub fn private_scalar(&self) -> &Scalar {
        &self.private_scalar
    }

    pub fn public_key(&self) -> CurvePoint {
        self.public_key
    }

    /// `poseidon(Ax, Ay)`, the holder's public identifier inside certificates.
    pub fn holder_commitment(&self) -> CryptoResult<FieldElement> {
        holder_commitment(&self.public_key)
    }

    pub fn ecdh(&self, counterparty: &CurvePoint) -> CryptoResult<SharedSecret> {
        ecdh(&self.private_scalar, counterparty)
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private_scalar.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// The x-coordinate of `sk * P`.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(FieldElement);

impl SharedSecret {
    pub fn as_field(&self) -> FieldElement {
        self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// Reduce big-endian bytes modulo the subgroup order.
///
/// This is the normalisation the circuit applies before scalar
/// multiplication, so off-circuit and in-circuit keys agree.
pub fn format_scalar_for_curve(raw_be_bytes: &[u8]) -> Scalar {
    Scalar::from_be_bytes_mod_order(raw_be_bytes)
}

fn check_signature_length(signature: &[u8]) -> CryptoResult<()> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(CryptoError::InvalidSignatureFormat(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }
    Ok(())
}

/// Derive the identity key pair from the wallet's signature over
/// [`KEY_DERIVATION_MESSAGE`].
pub fn derive_key_from_signature(signature: &[u8]) -> CryptoResult<KeyPair> {
    check_signature_length(signature)?;
    let scalar = format_scalar_for_curve(signature);
    let pair = KeyPair::from_private_scalar(scalar).map_err(|_| {
        CryptoError::InvalidSignatureFormat("signature reduces to the zero scalar".to_string())
    })?;
    debug!(public_x = %pair.public_key.x, "derived identity key");
    Ok(pair)
}

/// Parse a hex signature as returned by wallet RPCs (`0x` + 130 digits).
pub fn parse_signature_hex(signature: &str) -> CryptoResult<Vec<u8>> {
    let raw = signature.trim();
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(raw)
        .map_err(|e| CryptoError::InvalidSignatureFormat(format!("invalid hex: {e}")))?;
    check_signature_length(&bytes)?;
    Ok(bytes)
}

pub fn derive_key_from_signature_hex(signature: &str) -> CryptoResult<KeyPair> {
    derive_key_from_signature(&parse_signature_hex(signature)?)
}

/// Shared secret `x(sk * P)`. Symmetric: `ecdh(a, B) == ecdh(b, A)`.
pub fn ecdh(private_scalar: &Scalar, counterparty: &CurvePoint) -> CryptoResult<SharedSecret> {
    let shared = babyjub::mul_point(counterparty, private_scalar)?;
    Ok(SharedSecret(shared.x))
}

pub fn holder_commitment(public_key: &CurvePoint) -> CryptoResult<FieldElement> {
    poseidon_hash_2(public_key.x, public_key.y)
}

/// X25519 secret for encrypting the holder's certificate storage.
///
/// Derived from the same wallet signature as the identity key, under a
/// separate BLAKE3 context, so both keys are recoverable from one signature
/// but neither reveals the other.
pub fn derive_encryption_key_from_signature(signature: &[u8]) -> CryptoResult<StaticSecret> {
    check_signature_length(signature)?;
    let mut key_material = blake3::derive_key(ENCRYPTION_KEY_CONTEXT, signature);
    let secret = StaticSecret::from(key_material);
    key_material.zeroize();
    Ok(secret)
}
