//! Poseidon hash over the BN254 scalar field.
//!
//! This is the circomlib parameterisation (via `light-poseidon`), so every
//! digest matches what the `Poseidon(n)` circuit template recomputes. The
//! permutation supports up to 12 inputs; longer inputs are absorbed in chunks
//! with the running state as the first input of each following chunk.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use zkcert_core::FieldElement;

use crate::error::{CryptoError, CryptoResult};

/// Widest circom Poseidon instance.
pub const MAX_POSEIDON_INPUTS: usize = 12;

fn poseidon_circom(inputs: &[Fr]) -> CryptoResult<Fr> {
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())
        .map_err(|err| CryptoError::Hash(err.to_string()))?;
    hasher
        .hash(inputs)
        .map_err(|err| CryptoError::Hash(err.to_string()))
}

/// Hash one or more field elements.
///
/// Inputs longer than [`MAX_POSEIDON_INPUTS`] are chained:
/// `state = P(x[0..12])`, then `state = P(state, x[12..23])`, and so on.
pub fn poseidon_hash(inputs: &[FieldElement]) -> CryptoResult<FieldElement> {
    if inputs.is_empty() {
        return Err(CryptoError::EmptyHashInput);
    }
    let elements: Vec<Fr> = inputs.iter().map(|fe| fe.into_fr()).collect();
    if elements.len() <= MAX_POSEIDON_INPUTS {
        return poseidon_circom(&elements).map(FieldElement::from);
    }

    let (head, tail) = elements.split_at(MAX_POSEIDON_INPUTS);
    let mut state = poseidon_circom(head)?;
    for chunk in tail.chunks(MAX_POSEIDON_INPUTS - 1) {
        let mut absorb = Vec::with_capacity(chunk.len() + 1);
        absorb.push(state);
        absorb.extend_from_slice(chunk);
        state = poseidon_circom(&absorb)?;
    }
    Ok(state.into())
}

/// Hash two field elements together
pub fn poseidon_hash_2(a: FieldElement, b: FieldElement) -> CryptoResult<FieldElement> {
    poseidon_hash(&[a, b])
}

/// Hash fixed-width big-endian values as read from the registry.
///
/// Unlike a mod-order reduction, any value `>= p` is rejected.
pub fn poseidon_hash_be_bytes(inputs: &[[u8; 32]]) -> CryptoResult<FieldElement> {
    let elements = inputs
        .iter()
        .map(|bytes| FieldElement::from_be_bytes(bytes))
        .collect::<Result<Vec<_>, _>>()?;
    poseidon_hash(&elements)
}
