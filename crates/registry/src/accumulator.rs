//! Sparse, append-only Merkle accumulator mirroring the on-chain registry.
//!
//! The tree has a fixed depth and `2^depth` leaf slots. Unused slots hold
//! [`empty_leaf`], and every level stores only its populated prefix: any
//! node past the end of `levels[i]` equals `zero_hashes[i]`, the root of an
//! all-empty subtree of height `i`.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use sha3::{Digest, Keccak256};
use tracing::debug;
use zkcert_core::{FieldElement, MerkleConfig, MAX_MERKLE_DEPTH};
use zkcert_crypto::poseidon_hash_2;

use crate::error::{AccumulatorError, AccumulatorResult};
use crate::proof::MerkleProof;

static EMPTY_LEAF: Lazy<FieldElement> =
    Lazy::new(|| FieldElement::from_be_bytes_mod_order(&Keccak256::digest(b"Galactica")));

/// Value of an unused leaf slot, `keccak256("Galactica") mod p`.
pub fn empty_leaf() -> FieldElement {
    *EMPTY_LEAF
}

#[derive(Clone)]
pub struct MerkleAccumulator {
    depth: u32,
    levels: Vec<Vec<FieldElement>>,
    zero_hashes: Vec<FieldElement>,
    next_index: u64,
    leaf_positions: HashMap<FieldElement, u64>,
    revoked: BTreeSet<u64>,
}

impl MerkleAccumulator {
    pub fn new(depth: u32) -> AccumulatorResult<Self> {
        if depth == 0 || depth > MAX_MERKLE_DEPTH {
            return Err(AccumulatorError::InvalidDepth {
                depth,
                max: MAX_MERKLE_DEPTH,
            });
        }
        let mut zero_hashes = Vec::with_capacity(depth as usize + 1);
        zero_hashes.push(empty_leaf());
        for level in 0..depth as usize {
            let below = zero_hashes[level];
            zero_hashes.push(poseidon_hash_2(below, below)?);
        }
        Ok(Self {
            depth,
            levels: vec![Vec::new(); depth as usize + 1],
            zero_hashes,
            next_index: 0,
            leaf_positions: HashMap::new(),
            revoked: BTreeSet::new(),
        })
    }

    pub fn from_config(config: &MerkleConfig) -> AccumulatorResult<Self> {
        Self::new(config.depth)
    }

    /// Build a tree holding `leaves` at indices `0..leaves.len()`.
    pub fn from_leaves(depth: u32, leaves: &[FieldElement]) -> AccumulatorResult<Self> {
        let mut tree = Self::new(depth)?;
        tree.insert_leaves(leaves)?;
        Ok(tree)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of occupied slots, which is also the next free index.
    pub fn leaf_count(&self) -> u64 {
        self.next_index
    }

    pub fn root(&self) -> FieldElement {
        self.node(self.depth as usize, 0)
    }

    /// Root of an empty subtree of the given height.
    pub fn zero_hash(&self, level: u32) -> Option<FieldElement> {
        self.zero_hashes.get(level as usize).copied()
    }

    /// The populated prefix of the leaf level.
    pub fn leaves(&self) -> &[FieldElement] {
        &self.levels[0]
    }

    pub fn is_revoked(&self, index: u64) -> bool {
        self.revoked.contains(&index)
    }

    fn node(&self, level: usize, index: u64) -> FieldElement {
        self.levels[level]
            .get(index as usize)
            .copied()
            .unwrap_or(self.zero_hashes[level])
    }

    fn set_node(&mut self, level: usize, index: u64, value: FieldElement) {
        let zero = self.zero_hashes[level];
        let row = &mut self.levels[level];
        let index = index as usize;
        if index < row.len() {
            row[index] = value;
        } else {
            row.resize(index, zero);
            row.push(value);
        }
    }

    /// Recompute every ancestor of the leaves in `first..=last`, each once.
    fn update_ancestors(&mut self, first: u64, last: u64) -> AccumulatorResult<()> {
        let (mut lo, mut hi) = (first, last);
        for level in 0..self.depth as usize {
            let (parent_lo, parent_hi) = (lo / 2, hi / 2);
            for parent in parent_lo..=parent_hi {
                let left = self.node(level, 2 * parent);
                let right = self.node(level, 2 * parent + 1);
                let hash = poseidon_hash_2(left, right)?;
                self.set_node(level + 1, parent, hash);
            }
            lo = parent_lo;
            hi = parent_hi;
        }
        Ok(())
    }

    /// Append a batch at the next free index and return the assigned range.
    ///
    /// The batch is rejected as a whole with `TreeFull` if it does not fit.
    /// A leaf equal to [`empty_leaf`] is how the registry reports a revoked
    /// slot, so it is recorded as revoked and never indexed.
    pub fn insert_leaves(&mut self, leaves: &[FieldElement]) -> AccumulatorResult<Range<u64>> {
        let start = self.next_index;
        if leaves.is_empty() {
            return Ok(start..start);
        }
        let requested = leaves.len() as u64;
        let available = self.capacity() - start;
        if requested > available {
            return Err(AccumulatorError::TreeFull {
                requested,
                available,
            });
        }

        self.levels[0].extend_from_slice(leaves);
        let empty = empty_leaf();
        for (offset, leaf) in leaves.iter().enumerate() {
            let index = start + offset as u64;
            if *leaf == empty {
                self.revoked.insert(index);
            } else {
                self.leaf_positions.entry(*leaf).or_insert(index);
            }
        }
        self.next_index = start + requested;
        self.update_ancestors(start, self.next_index - 1)?;

        debug!(
            from = start,
            count = requested,
            root = %self.root(),
            "inserted leaves"
        );
        Ok(start..self.next_index)
    }

    pub fn insert_leaf(&mut self, leaf: FieldElement) -> AccumulatorResult<u64> {
        self.insert_leaves(&[leaf]).map(|range| range.start)
    }

    /// Membership proof against the current root.
    pub fn create_proof(&self, leaf_index: u64) -> AccumulatorResult<MerkleProof> {
        if leaf_index >= self.next_index {
            return Err(AccumulatorError::IndexOutOfRange {
                index: leaf_index,
                next_index: self.next_index,
            });
        }
        let path_elements = (0..self.depth as usize)
            .map(|level| self.node(level, (leaf_index >> level) ^ 1))
            .collect();
        Ok(MerkleProof {
            leaf: self.node(0, leaf_index),
            leaf_index,
            path_elements,
            root: self.root(),
        })
    }

    /// Index of the first insertion of `leaf`.
    pub fn get_leaf_index(&self, leaf: &FieldElement) -> AccumulatorResult<u64> {
        self.leaf_positions
            .get(leaf)
            .copied()
            .ok_or(AccumulatorError::LeafNotFound(*leaf))
    }

    fn check_occupied(&self, index: u64) -> AccumulatorResult<()> {
        if index >= self.next_index {
            return Err(AccumulatorError::IndexOutOfRange {
                index,
                next_index: self.next_index,
            });
        }
        Ok(())
    }

    /// Replace the leaf at `index` with [`empty_leaf`]. Revoking an already
    /// revoked slot is a no-op.
    pub fn revoke_leaf(&mut self, index: u64) -> AccumulatorResult<()> {
        self.check_occupied(index)?;
        if self.revoked.contains(&index) {
            return Ok(());
        }
        let old = self.node(0, index);
        self.set_node(0, index, empty_leaf());
        self.update_ancestors(index, index)?;
        self.revoked.insert(index);

        if self.leaf_positions.get(&old) == Some(&index) {
            self.leaf_positions.remove(&old);
            // A later duplicate becomes the first live insertion.
            let next = self.levels[0]
                .iter()
                .enumerate()
                .skip(index as usize + 1)
                .find(|(i, leaf)| **leaf == old && !self.revoked.contains(&(*i as u64)))
                .map(|(i, _)| i as u64);
            if let Some(next) = next {
                self.leaf_positions.insert(old, next);
            }
        }
        debug!(index, root = %self.root(), "revoked leaf");
        Ok(())
    }

    /// Place a new leaf into a previously revoked slot.
    pub fn reissue_leaf(&mut self, index: u64, leaf: FieldElement) -> AccumulatorResult<()> {
        self.check_occupied(index)?;
        if !self.revoked.contains(&index) {
            return Err(AccumulatorError::SlotNotRevoked(index));
        }
        if leaf == empty_leaf() {
            return Ok(());
        }
        self.set_node(0, index, leaf);
        self.update_ancestors(index, index)?;
        self.revoked.remove(&index);
        let position = self.leaf_positions.entry(leaf).or_insert(index);
        if *position > index {
            *position = index;
        }
        debug!(index, root = %self.root(), "reissued leaf");
        Ok(())
    }
}

impl fmt::Debug for MerkleAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleAccumulator")
            .field("depth", &self.depth)
            .field("next_index", &self.next_index)
            .field("root", &self.root())
            .finish_non_exhaustive()
    }
}
