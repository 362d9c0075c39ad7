//! EdDSA over Baby Jubjub with Poseidon as the challenge hash.
//!
//! Verification is the check performed by circomlib's
//! `EdDSAPoseidonVerifier`:
//!
//! ```text
//! hm = poseidon(R8.x, R8.y, A.x, A.y, msg)
//! S * Base8 == R8 + (8 * hm) * A
//! ```
//!
//! Signing uses a deterministic nonce derived with BLAKE3 from the private
//! scalar and the message, so signatures are reproducible and never reuse a
//! nonce across messages.

use ark_ff::{BigInteger, PrimeField, Zero};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;
use zkcert_core::FieldElement;

use crate::babyjub::{self, CurvePoint, Scalar};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::KeyPair;
use crate::poseidon::poseidon_hash;

const NONCE_CONTEXT: &str = "zkCert 2024-06 eddsa-poseidon nonce v1";

/// `(R8, S)` with `S < l`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EddsaSignature {
    pub r8: CurvePoint,
    pub s: FieldElement,
}

fn challenge(r8: &CurvePoint, public_key: &CurvePoint, msg: FieldElement) -> CryptoResult<FieldElement> {
    poseidon_hash(&[r8.x, r8.y, public_key.x, public_key.y, msg])
}

fn to_scalar(value: FieldElement) -> Scalar {
    Scalar::from_be_bytes_mod_order(&value.to_be_bytes())
}

fn nonce(private_scalar: &Scalar, msg: FieldElement) -> Scalar {
    let mut secret_bytes = private_scalar.into_bigint().to_bytes_le();
    let mut hasher = blake3::Hasher::new_derive_key(NONCE_CONTEXT);
    hasher.update(&secret_bytes);
    hasher.update(&msg.to_be_bytes());
    secret_bytes.zeroize();
    let mut wide = [0u8; 64];
    hasher.finalize_xof().fill(&mut wide);
    let r = Scalar::from_le_bytes_mod_order(&wide);
    wide.zeroize();
    r
}

/// Sign a field-element message with the key pair's private scalar.
pub fn sign(key_pair: &KeyPair, msg: FieldElement) -> CryptoResult<EddsaSignature> {
    let r = nonce(key_pair.private_scalar(), msg);
    if r.is_zero() {
        return Err(CryptoError::InvalidScalar("derived nonce is zero".to_string()));
    }
    let r8 = babyjub::mul_base(&r);
    let hm = challenge(&r8, &key_pair.public_key(), msg)?;
    let s = r + Scalar::from(8u64) * to_scalar(hm) * key_pair.private_scalar();
    let s = FieldElement::from_be_bytes_mod_order(&s.into_bigint().to_bytes_be());
    Ok(EddsaSignature { r8, s })
}

/// Verify a signature; any malformed component makes it invalid.
pub fn verify(public_key: &CurvePoint, msg: FieldElement, signature: &EddsaSignature) -> bool {
    if !public_key.is_on_curve() || !signature.r8.is_on_curve() {
        return false;
    }
    if signature.s.to_biguint() >= BigUint::from(Scalar::MODULUS) {
        return false;
    }
    let hm = match challenge(&signature.r8, public_key, msg) {
        Ok(hm) => hm,
        Err(_) => return false,
    };

    let left = babyjub::mul_base(&to_scalar(signature.s));
    let scaled_key = public_key.mul_limbs(&[8]).mul_limbs(hm.as_fr().into_bigint().as_ref());
    let right = babyjub::add_points(&signature.r8, &scaled_key);
    left == right
}
