//! MiMC Feistel permutation and sponge, circomlib parameterisation.
//!
//! 220 rounds of `t^5` with `t = xL + k + c_i`. Round constants are the
//! keccak256 hash chain seeded with `"mimcsponge"`: `c_0 = 0`,
//! `c_i = keccak256^i(seed) mod p` and `c_219 = 0`.

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField, Zero};
use once_cell::sync::Lazy;
use sha3::{Digest, Keccak256};
use zkcert_core::FieldElement;

pub const MIMC_ROUNDS: usize = 220;
pub const MIMC_SEED: &str = "mimcsponge";

static ROUND_CONSTANTS: Lazy<Vec<Fr>> = Lazy::new(|| round_constants(MIMC_SEED, MIMC_ROUNDS));

fn round_constants(seed: &str, rounds: usize) -> Vec<Fr> {
    let mut constants = vec![Fr::zero(); rounds];
    let mut digest: [u8; 32] = Keccak256::digest(seed.as_bytes()).into();
    // First and last constants stay zero.
    for constant in constants.iter_mut().take(rounds - 1).skip(1) {
        digest = Keccak256::digest(digest).into();
        *constant = Fr::from_be_bytes_mod_order(&digest);
    }
    constants
}

/// The round constants, exposed for circuit parameter checks.
pub fn mimc_round_constants() -> Vec<FieldElement> {
    ROUND_CONSTANTS.iter().copied().map(FieldElement::from).collect()
}

#[inline]
fn round_term(xl: Fr, k: Fr, c: Fr) -> Fr {
    let t = xl + k + c;
    let t2 = t.square();
    t2.square() * t
}

/// Forward permutation of `(xL, xR)` under key `k`.
pub fn mimc_feistel(
    xl: FieldElement,
    xr: FieldElement,
    k: FieldElement,
) -> (FieldElement, FieldElement) {
    let constants = &*ROUND_CONSTANTS;
    let last = constants.len() - 1;
    let k = k.into_fr();
    let (mut xl, mut xr) = (xl.into_fr(), xr.into_fr());

    for (i, c) in constants.iter().enumerate() {
        let t5 = round_term(xl, k, *c);
        if i < last {
            let next = xr + t5;
            xr = xl;
            xl = next;
        } else {
            xr += t5;
        }
    }
    (xl.into(), xr.into())
}

/// Exact inverse of [`mimc_feistel`] under the same key.
pub fn mimc_feistel_inverse(
    xl: FieldElement,
    xr: FieldElement,
    k: FieldElement,
) -> (FieldElement, FieldElement) {
    let constants = &*ROUND_CONSTANTS;
    let last = constants.len() - 1;
    let k = k.into_fr();
    let (mut xl, mut xr) = (xl.into_fr(), xr.into_fr());

    xr -= round_term(xl, k, constants[last]);
    for c in constants[..last].iter().rev() {
        let prev_l = xr;
        xr = xl - round_term(prev_l, k, *c);
        xl = prev_l;
    }
    (xl.into(), xr.into())
}

/// circomlib `MiMCSponge(nInputs, 220, nOutputs)`.
///
/// Each input is added to the rate element before a permutation; further
/// outputs are squeezed by permuting again.
pub fn mimc_sponge(inputs: &[FieldElement], k: FieldElement, outputs: usize) -> Vec<FieldElement> {
    let mut rate = FieldElement::zero();
    let mut capacity = FieldElement::zero();
    for input in inputs {
        (rate, capacity) = mimc_feistel(rate + *input, capacity, k);
    }

    let mut squeezed = Vec::with_capacity(outputs);
    if outputs == 0 {
        return squeezed;
    }
    squeezed.push(rate);
    for _ in 1..outputs {
        (rate, capacity) = mimc_feistel(rate, capacity, k);
        squeezed.push(rate);
    }
    squeezed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(value: u64) -> FieldElement {
        FieldElement::from_u64(value)
    }

    #[test]
    fn test_round_constant_shape() {
        let constants = mimc_round_constants();
        assert_eq!(constants.len(), MIMC_ROUNDS);
        assert!(constants[0].is_zero());
        assert!(constants[MIMC_ROUNDS - 1].is_zero());
        assert!(constants[1..MIMC_ROUNDS - 1].iter().all(|c| !c.is_zero()));
    }

    #[test]
    fn test_first_constant_is_second_keccak() {
        let first: [u8; 32] = Keccak256::digest(MIMC_SEED.as_bytes()).into();
        let second: [u8; 32] = Keccak256::digest(first).into();
        assert_eq!(
            mimc_round_constants()[1],
            FieldElement::from_be_bytes_mod_order(&second)
        );
    }

    #[test]
    fn test_constants_match_circomlib_table() {
        let constants = mimc_round_constants();
        let expected = [
            (1, "0x0fbe43c36a80e36d7c7c584d4f8f3759fb51f0d66065d8a227b688d12488c5d4"),
            (2, "0x0b1be1e55d1138dcfc4eeee6618b1b7cde5c4a262e83139555673f5751efc1c9"),
            (218, "0x04af9e46dbc42b94137981fece56e9775d00fc101129f08fd6b781f439c20c0b"),
        ];
        for (i, hex) in expected {
            assert_eq!(constants[i], FieldElement::from_hex(hex).unwrap(), "c_{i}");
        }
    }

    #[test]
    fn test_feistel_known_answer() {
        let (l, r) = mimc_feistel(fe(1), fe(2), fe(3));
        assert_eq!(
            l,
            FieldElement::from_hex("0x28c6f78ee3ed6b336280d3e522b03efc49eeb5a2a3af1075ccf6f64e5d867e53")
                .unwrap()
        );
        assert_eq!(
            r,
            FieldElement::from_hex("0x05d9ff7555e18007f7809e5977e6dd41ff93ca7c8d11249d51eaeb0b4f727d37")
                .unwrap()
        );
    }

    #[test]
    fn test_inverse_undoes_permutation() {
        let (l, r) = mimc_feistel(fe(11), fe(22), fe(33));
        assert_ne!((l, r), (fe(11), fe(22)));
        assert_eq!(mimc_feistel_inverse(l, r, fe(33)), (fe(11), fe(22)));
    }

    #[test]
    fn test_key_changes_output() {
        assert_ne!(
            mimc_feistel(fe(1), fe(2), fe(3)),
            mimc_feistel(fe(1), fe(2), fe(4))
        );
    }

    #[test]
    fn test_sponge_squeezes_requested_outputs() {
        let outputs = mimc_sponge(&[fe(1), fe(2)], FieldElement::zero(), 3);
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0], mimc_sponge(&[fe(1), fe(2)], FieldElement::zero(), 1)[0]);
        assert_ne!(outputs[0], outputs[1]);
        assert!(mimc_sponge(&[fe(1)], FieldElement::zero(), 0).is_empty());
    }
}
