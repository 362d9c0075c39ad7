//! Encoding of content values into field elements.

use zkcert_core::{FieldElement, FIELD_BYTES};
use zkcert_crypto::{poseidon_hash, CryptoResult};

use crate::error::{CertificateError, CertificateResult};

/// Bytes per limb; 31 bytes always fit below the modulus.
pub const STRING_LIMB_BYTES: usize = 31;

/// Hash a string into one field element.
///
/// The UTF-8 bytes are split into 31-byte limbs, each read as a big-endian
/// integer, and Poseidon hashes the byte length followed by the limbs. The
/// length keeps leading zero bytes significant, so `"a"` and `"\0a"` differ.
/// The empty string hashes its zero length alone.
pub fn hash_string(value: &str) -> CryptoResult<FieldElement> {
    let bytes = value.as_bytes();
    let mut elements = Vec::with_capacity(1 + bytes.len().div_ceil(STRING_LIMB_BYTES));
    elements.push(FieldElement::from_u64(bytes.len() as u64));
    elements.extend(bytes.chunks(STRING_LIMB_BYTES).map(|chunk| {
        let mut buf = [0u8; FIELD_BYTES];
        buf[FIELD_BYTES - chunk.len()..].copy_from_slice(chunk);
        FieldElement::from_be_bytes_mod_order(&buf)
    }));
    poseidon_hash(&elements)
}

pub fn encode_bool(value: bool) -> FieldElement {
    if value {
        FieldElement::one()
    } else {
        FieldElement::zero()
    }
}

/// A 20-byte `0x` address as the integer circuits compare against.
pub fn encode_address(address: &str) -> CertificateResult<FieldElement> {
    let raw = address.trim();
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CertificateError::InvalidAddress(address.to_string()));
    }
    Ok(FieldElement::from_hex(digits)?)
}
