//! Canonical field element for every value that crosses a circuit boundary.
//!
//! All hashes, tree nodes, shares, shared secrets and ciphertexts in zkCert
//! are elements of the BN254 scalar field. [`FieldElement`] is the single
//! in-memory representation: an always-reduced `ark_bn254::Fr`.
//!
//! # Boundary encodings
//!
//! - **Circuit / JSON**: decimal string (`Display`, `FromStr`, serde).
//! - **Registry**: fixed-width 32-byte big-endian (`to_be_bytes`, `from_hex`).
//!
//! Every constructor that accepts an external value rejects values that are
//! not strictly below the modulus with [`FieldError::FieldOverflow`]. The only
//! reducing constructor is [`FieldElement::from_be_bytes_mod_order`], which
//! callers use where reduction is an explicit step (e.g. turning a signature
//! or a keccak digest into a field element).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// Width of the fixed big-endian encoding.
pub const FIELD_BYTES: usize = 32;

/// The BN254 scalar field modulus in decimal.
pub const MODULUS_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// An element of the BN254 scalar field, always stored reduced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self(Fr::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// The field modulus as an arbitrary-precision integer.
    pub fn modulus() -> BigUint {
        BigUint::from(Fr::MODULUS)
    }

    /// Build an element from an integer, rejecting values `>= p`.
    pub fn from_biguint(value: &BigUint) -> Result<Self, FieldError> {
        if *value >= Self::modulus() {
            return Err(FieldError::FieldOverflow {
                value: value.to_string(),
            });
        }
        Ok(Self(Fr::from(value.clone())))
    }

    /// Parse the canonical decimal encoding.
    pub fn from_decimal_str(s: &str) -> Result<Self, FieldError> {
        let digits = s.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::InvalidEncoding(format!(
                "expected a non-negative decimal integer, got {s:?}"
            )));
        }
        let value = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| {
            FieldError::InvalidEncoding(format!("unparseable decimal integer {s:?}"))
        })?;
        Self::from_biguint(&value)
    }

    /// Parse a fixed-width 32-byte big-endian value without reduction.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() != FIELD_BYTES {
            return Err(FieldError::InvalidLength {
                expected: FIELD_BYTES,
                actual: bytes.len(),
            });
        }
        Self::from_biguint(&BigUint::from_bytes_be(bytes))
    }

    /// Interpret arbitrary big-endian bytes as an integer and reduce it mod p.
    ///
    /// This is the only reducing constructor. Use it only where reduction is
    /// part of the documented derivation.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Parse a `0x`-prefixed (or bare) hex value of at most 32 bytes, as
    /// returned by the registry for `bytes32`/`uint256` slots.
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let raw = s.trim();
        let raw = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        if raw.is_empty() || raw.len() > FIELD_BYTES * 2 {
            return Err(FieldError::InvalidEncoding(format!(
                "expected 1..=64 hex digits, got {}",
                raw.len()
            )));
        }
        let padded = format!("{raw:0>64}");
        let bytes = hex::decode(&padded)
            .map_err(|e| FieldError::InvalidEncoding(format!("invalid hex: {e}")))?;
        Self::from_be_bytes(&bytes)
    }

    /// Fixed-width 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; FIELD_BYTES];
        let offset = FIELD_BYTES - bytes.len();
        out[offset..].copy_from_slice(&bytes);
        out
    }

    /// `0x`-prefixed, zero-padded 64 digit hex encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    /// Canonical decimal encoding expected by circuits.
    pub fn to_decimal_string(&self) -> String {
        self.to_biguint().to_string()
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from(self.0.into_bigint())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn inverse(&self) -> Option<Self> {
        self.0.inverse().map(Self)
    }

    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Wrap an arkworks element. Arkworks elements are reduced by construction.
    pub fn from_fr(value: Fr) -> Self {
        Self(value)
    }

    pub fn as_fr(&self) -> &Fr {
        &self.0
    }

    pub fn into_fr(self) -> Fr {
        self.0
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<FieldElement> for Fr {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal_string())
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal_str(&s).map_err(serde::de::Error::custom)
    }
}
