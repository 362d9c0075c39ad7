//! Merkle accumulator for the zkCertificate registry.
//!
//! Provides the local mirror of the on-chain registry tree, membership
//! proofs in the JSON shape circuits consume, and paged rebuilds from a
//! remote registry.

pub mod accumulator;
pub mod error;
pub mod proof;
pub mod sync;

pub use accumulator::{empty_leaf, MerkleAccumulator};
pub use error::{AccumulatorError, AccumulatorResult, RegistryError};
pub use proof::{verify_proof, MerkleProof};
pub use sync::{InMemoryRegistry, LeafRegistry, SyncStatus, TreeRebuilder};
