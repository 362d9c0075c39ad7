//! Cryptographic primitives for the zkCert engine.
//!
//! Everything here is chosen so that a value computed off-circuit is
//! bit-identical to what a circom circuit recomputes:
//!
//! - **Hashing**: Poseidon, circomlib parameterisation ([`poseidon`])
//! - **Permutation**: MiMC Feistel, 220 rounds ([`mimc`])
//! - **Curve**: Baby Jubjub with generator `Base8` ([`babyjub`])
//! - **Identity keys**: wallet-signature derived key pairs and ECDH ([`keys`])
//! - **Provider signatures**: EdDSA-Poseidon ([`eddsa`])
//! - **Threshold sharing**: Shamir over the BN254 scalar field ([`shamir`])
//! - **Field cipher**: MiMC keyed by `poseidon(shared, nonce)` ([`cipher`])
//!
//! [`sealed`] is the one non-circuit primitive: X25519 + ChaCha20-Poly1305
//! boxes for exporting certificates to storage.
//!
//! # Security Principles
//!
//! - Private scalars are zeroized on drop and never serialized or logged
//! - Counterparty points are validated before every scalar multiplication
//! - Keys are passed by argument; there is no process-wide key store

pub mod babyjub;
pub mod cipher;
pub mod eddsa;
pub mod error;
pub mod keys;
pub mod mimc;
pub mod poseidon;
pub mod sealed;
pub mod shamir;

pub use babyjub::{add_points, base_point, is_valid_public_point, mul_base, mul_point, CurvePoint, Scalar};
pub use cipher::{decrypt, decrypt_bytes, encrypt, encrypt_bytes, EncryptedPayload};
pub use eddsa::EddsaSignature;
pub use error::{CryptoError, CryptoResult};
pub use keys::{
    derive_encryption_key_from_signature, derive_key_from_signature, ecdh,
    format_scalar_for_curve, holder_commitment, KeyPair, SharedSecret, KEY_DERIVATION_MESSAGE,
    SIGNATURE_LENGTH,
};
pub use mimc::{mimc_feistel, mimc_feistel_inverse, mimc_sponge};
pub use poseidon::{poseidon_hash, poseidon_hash_2};
pub use sealed::{SealError, SealedBox};
pub use shamir::{reconstruct, split, ShamirShare, SharingError, SharingPolynomial};
