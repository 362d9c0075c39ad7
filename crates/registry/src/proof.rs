//! Membership proofs in the shape circuits consume.

use serde::{Deserialize, Serialize};
use tracing::warn;
use zkcert_core::FieldElement;
use zkcert_crypto::poseidon_hash_2;

use crate::error::{AccumulatorError, AccumulatorResult};

/// A leaf, its index, one sibling per level (leaf level first) and the root
/// the path folds to.
///
/// Bit `i` of `leaf_index` is the direction at level `i`: `1` means the
/// running node is the right child and its sibling goes on the left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    pub leaf: FieldElement,
    pub leaf_index: u64,
    pub path_elements: Vec<FieldElement>,
    pub root: FieldElement,
}

impl MerkleProof {
    pub fn depth(&self) -> usize {
        self.path_elements.len()
    }

    /// Per-level direction bits, least significant first, as circuits take
    /// them.
    pub fn path_indices(&self) -> Vec<u8> {
        (0..self.depth())
            .map(|level| {
                if level < 64 {
                    ((self.leaf_index >> level) & 1) as u8
                } else {
                    0
                }
            })
            .collect()
    }

    fn index_fits(&self) -> bool {
        self.depth() >= 64 || self.leaf_index >> self.depth() == 0
    }

    /// Fold the path from the leaf upward.
    pub fn compute_root(&self) -> AccumulatorResult<FieldElement> {
        let mut node = self.leaf;
        for (sibling, bit) in self.path_elements.iter().zip(self.path_indices()) {
            node = if bit == 1 {
                poseidon_hash_2(*sibling, node)?
            } else {
                poseidon_hash_2(node, *sibling)?
            };
        }
        Ok(node)
    }

    /// True when the path folds to `root` and the index fits the depth.
    pub fn verify(&self) -> bool {
        self.index_fits() && matches!(self.compute_root(), Ok(root) if root == self.root)
    }

    /// Pre-submission check against the registry's current root.
    ///
    /// `InvalidProof` if the proof is internally inconsistent, `StaleProof` if
    /// it is consistent but for a root the registry no longer has.
    pub fn ensure_fresh(&self, authoritative_root: FieldElement) -> AccumulatorResult<()> {
        if !self.verify() {
            return Err(AccumulatorError::InvalidProof);
        }
        if self.root != authoritative_root {
            warn!(
                leaf_index = self.leaf_index,
                proof_root = %self.root,
                registry_root = %authoritative_root,
                "stale merkle proof"
            );
            return Err(AccumulatorError::StaleProof {
                proof_root: self.root,
                current_root: authoritative_root,
            });
        }
        Ok(())
    }
}

/// Stateless proof check; see [`MerkleProof::verify`].
pub fn verify_proof(proof: &MerkleProof) -> bool {
    proof.verify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::MerkleAccumulator;

    fn fe(value: u64) -> FieldElement {
        FieldElement::from_u64(value)
    }

    fn sample_tree() -> MerkleAccumulator {
        MerkleAccumulator::from_leaves(3, &[fe(1), fe(2), fe(3), fe(4), fe(5)]).unwrap()
    }

    #[test]
    fn test_path_indices_are_lsb_first() {
        let proof = sample_tree().create_proof(5 - 1).unwrap();
        assert_eq!(proof.leaf_index, 4);
        assert_eq!(proof.path_indices(), vec![0, 0, 1]);
        let proof = sample_tree().create_proof(3).unwrap();
        assert_eq!(proof.path_indices(), vec![1, 1, 0]);
    }

    #[test]
    fn test_tampered_proofs_fail() {
        let proof = sample_tree().create_proof(2).unwrap();
        assert!(verify_proof(&proof));

        let mut wrong_leaf = proof.clone();
        wrong_leaf.leaf = fe(100);
        assert!(!wrong_leaf.verify());

        let mut wrong_index = proof.clone();
        wrong_index.leaf_index = 3;
        assert!(!wrong_index.verify());

        let mut wrong_sibling = proof.clone();
        wrong_sibling.path_elements[1] = fe(0);
        assert!(!wrong_sibling.verify());
    }

    #[test]
    fn test_index_beyond_depth_fails() {
        let mut proof = sample_tree().create_proof(2).unwrap();
        // Same low bits, so the fold alone would still succeed.
        proof.leaf_index = 2 + (1 << 3);
        assert_eq!(proof.compute_root().unwrap(), proof.root);
        assert!(!proof.verify());
    }

    #[test]
    fn test_ensure_fresh() {
        let mut tree = sample_tree();
        let proof = tree.create_proof(4).unwrap();
        assert!(proof.ensure_fresh(tree.root()).is_ok());

        tree.insert_leaf(fe(6)).unwrap();
        let err = proof.ensure_fresh(tree.root()).unwrap_err();
        assert!(matches!(err, AccumulatorError::StaleProof { .. }));
        assert!(err.is_retryable());

        let mut broken = proof.clone();
        broken.leaf = fe(0);
        assert_eq!(
            broken.ensure_fresh(proof.root),
            Err(AccumulatorError::InvalidProof)
        );
    }

    #[test]
    fn test_json_field_names() {
        let proof = sample_tree().create_proof(1).unwrap();
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["leafIndex"], 1);
        assert_eq!(json["leaf"], "2");
        assert_eq!(json["pathElements"].as_array().unwrap().len(), 3);
        assert!(json["root"].is_string());
        let back: MerkleProof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }
}
