//! Shamir secret sharing over the BN254 scalar field.
//!
//! A secret `s` is the constant term of a degree `T-1` polynomial; share `i`
//! is its evaluation at `x = i`. Any `T` shares interpolate back to `s`.
//!
//! Reconstruction trusts its input: too few shares or a tampered value yield
//! a wrong secret without an error. Integrity of shares is checked by the
//! circuit that produced their encryptions.

use std::collections::HashSet;
use std::fmt;

use ark_bn254::Fr;
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zkcert_core::FieldElement;

use crate::error::CryptoError;
use crate::poseidon::poseidon_hash_2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharingError {
    #[error("Invalid threshold {threshold} for {share_count} shares")]
    InvalidThreshold { threshold: usize, share_count: usize },

    #[error("Share index 0 would reveal the secret")]
    ZeroIndex,

    #[error("Duplicate share index {0}")]
    DuplicateIndex(u64),

    #[error("No shares supplied")]
    NoShares,

    #[error("Coefficient derivation failed: {0}")]
    Crypto(#[from] CryptoError),
}

pub type SharingResult<T> = std::result::Result<T, SharingError>;

/// One evaluation point of the sharing polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShamirShare {
    pub index: u64,
    pub value: FieldElement,
}

/// The polynomial behind a set of shares. Keep it only as long as more
/// shares may be needed; its constant term is the secret.
#[derive(Clone)]
pub struct SharingPolynomial {
    coefficients: Vec<FieldElement>,
}

impl SharingPolynomial {
    /// Coefficients `a_k = poseidon(salt, k)` for `k = 1..T-1`.
    ///
    /// Deterministic given the salt, so a share set can be audited against
    /// the salt committed alongside it.
    pub fn from_salt(
        secret: FieldElement,
        threshold: usize,
        salt: FieldElement,
    ) -> SharingResult<Self> {
        check_threshold(threshold, threshold)?;
        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(secret);
        for k in 1..threshold {
            coefficients.push(poseidon_hash_2(salt, FieldElement::from_u64(k as u64))?);
        }
        Ok(Self { coefficients })
    }

    /// Uniformly random coefficients.
    pub fn random<R: RngCore + CryptoRng>(
        secret: FieldElement,
        threshold: usize,
        rng: &mut R,
    ) -> SharingResult<Self> {
        check_threshold(threshold, threshold)?;
        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(secret);
        for _ in 1..threshold {
            coefficients.push(FieldElement::from_fr(Fr::rand(rng)));
        }
        Ok(Self { coefficients })
    }

    pub fn threshold(&self) -> usize {
        self.coefficients.len()
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: FieldElement) -> FieldElement {
        self.coefficients
            .iter()
            .rev()
            .fold(FieldElement::zero(), |acc, coefficient| acc * x + *coefficient)
    }

    pub fn share(&self, index: u64) -> SharingResult<ShamirShare> {
        if index == 0 {
            return Err(SharingError::ZeroIndex);
        }
        Ok(ShamirShare {
            index,
            value: self.evaluate(FieldElement::from_u64(index)),
        })
    }

    /// Shares at indices `1..=count`.
    pub fn shares(&self, count: usize) -> Vec<ShamirShare> {
        (1..=count as u64)
            .map(|index| ShamirShare {
                index,
                value: self.evaluate(FieldElement::from_u64(index)),
            })
            .collect()
    }
}

impl fmt::Debug for SharingPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharingPolynomial")
            .field("threshold", &self.threshold())
            .finish_non_exhaustive()
    }
}

fn check_threshold(threshold: usize, share_count: usize) -> SharingResult<()> {
    if threshold == 0 || threshold > share_count {
        return Err(SharingError::InvalidThreshold {
            threshold,
            share_count,
        });
    }
    Ok(())
}

/// Split `secret` into `share_count` shares, any `threshold` of which
/// reconstruct it.
pub fn split(
    secret: FieldElement,
    threshold: usize,
    share_count: usize,
    salt: FieldElement,
) -> SharingResult<Vec<ShamirShare>> {
    check_threshold(threshold, share_count)?;
    let polynomial = SharingPolynomial::from_salt(secret, threshold, salt)?;
    debug!(threshold, share_count, "split secret");
    Ok(polynomial.shares(share_count))
}

/// Lagrange interpolation at zero over the first `min(threshold, len)`
/// shares.
pub fn reconstruct(threshold: usize, shares: &[ShamirShare]) -> SharingResult<FieldElement> {
    if shares.is_empty() {
        return Err(SharingError::NoShares);
    }
    if threshold == 0 {
        return Err(SharingError::InvalidThreshold {
            threshold,
            share_count: shares.len(),
        });
    }
    let used = &shares[..threshold.min(shares.len())];

    let mut seen = HashSet::with_capacity(used.len());
    for share in used {
        if share.index == 0 {
            return Err(SharingError::ZeroIndex);
        }
        if !seen.insert(share.index) {
            return Err(SharingError::DuplicateIndex(share.index));
        }
    }

    let mut secret = FieldElement::zero();
    for (j, share_j) in used.iter().enumerate() {
        let x_j = FieldElement::from_u64(share_j.index);
        let mut numerator = FieldElement::one();
        let mut denominator = FieldElement::one();
        for (m, share_m) in used.iter().enumerate() {
            if m == j {
                continue;
            }
            let x_m = FieldElement::from_u64(share_m.index);
            numerator = numerator * x_m;
            denominator = denominator * (x_m - x_j);
        }
        // Distinct non-zero indices below p keep the denominator invertible.
        let inverse = denominator
            .inverse()
            .ok_or(SharingError::DuplicateIndex(share_j.index))?;
        secret = secret + share_j.value * numerator * inverse;
    }
    Ok(secret)
}
