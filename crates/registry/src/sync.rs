//! Rebuilding the accumulator from a remote registry.
//!
//! The registry is abstracted behind the synchronous [`LeafRegistry`] trait;
//! hosts implement it over their RPC client. [`TreeRebuilder`] pulls leaves
//! in pages into a caller-owned [`MerkleAccumulator`], so a failed or
//! cancelled rebuild keeps every page fetched so far and a later
//! [`TreeRebuilder::sync`] resumes from the tree's next free index.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use zkcert_core::{FieldElement, MerkleConfig, DEFAULT_SYNC_PAGE_SIZE};

use crate::accumulator::MerkleAccumulator;
use crate::error::{AccumulatorError, AccumulatorResult, RegistryError};

/// Read access to the authoritative leaf list.
pub trait LeafRegistry: Send + Sync {
    fn current_root(&self) -> Result<FieldElement, RegistryError>;

    fn leaf_count(&self) -> Result<u64, RegistryError>;

    /// Leaves at indices `from..to`.
    fn fetch_leaves(&self, from: u64, to: u64) -> Result<Vec<FieldElement>, RegistryError>;
}

/// Registry held in memory, for hosts that already have the leaf list and
/// for tests.
#[derive(Debug, Clone)]
pub struct InMemoryRegistry {
    tree: MerkleAccumulator,
}

impl InMemoryRegistry {
    pub fn new(depth: u32) -> AccumulatorResult<Self> {
        Ok(Self {
            tree: MerkleAccumulator::new(depth)?,
        })
    }

    pub fn from_leaves(depth: u32, leaves: &[FieldElement]) -> AccumulatorResult<Self> {
        Ok(Self {
            tree: MerkleAccumulator::from_leaves(depth, leaves)?,
        })
    }

    pub fn tree(&self) -> &MerkleAccumulator {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MerkleAccumulator {
        &mut self.tree
    }
}

impl LeafRegistry for InMemoryRegistry {
    fn current_root(&self) -> Result<FieldElement, RegistryError> {
        Ok(self.tree.root())
    }

    fn leaf_count(&self) -> Result<u64, RegistryError> {
        Ok(self.tree.leaf_count())
    }

    fn fetch_leaves(&self, from: u64, to: u64) -> Result<Vec<FieldElement>, RegistryError> {
        let leaves = self.tree.leaves();
        if from > to || to > leaves.len() as u64 {
            return Err(RegistryError::InvalidResponse(format!(
                "range {from}..{to} outside 0..{}",
                leaves.len()
            )));
        }
        Ok(leaves[from as usize..to as usize].to_vec())
    }
}

/// Outcome of a sync that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Local tree matches the registry root.
    Complete { root: FieldElement, leaf_count: u64 },
    /// Cancellation was requested; `next_index` is where a resume starts.
    Cancelled { next_index: u64 },
}

pub struct TreeRebuilder<'a, R: LeafRegistry + ?Sized> {
    registry: &'a R,
    page_size: u64,
    cancel: Arc<AtomicBool>,
}

impl<'a, R: LeafRegistry + ?Sized> TreeRebuilder<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            page_size: DEFAULT_SYNC_PAGE_SIZE,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(registry: &'a R, config: &MerkleConfig) -> Self {
        Self::new(registry).with_page_size(config.page_size)
    }

    /// Page size, at least one leaf.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Share an existing cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Setting the flag stops the sync before the next page.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Fetch a fresh tree of the given depth.
    pub fn rebuild(&self, depth: u32) -> AccumulatorResult<(MerkleAccumulator, SyncStatus)> {
        let mut tree = MerkleAccumulator::new(depth)?;
        let status = self.sync(&mut tree)?;
        Ok((tree, status))
    }

    /// Bring `tree` up to date with the registry, starting at its next free
    /// index.
    pub fn sync(&self, tree: &mut MerkleAccumulator) -> AccumulatorResult<SyncStatus> {
        let local_count = tree.leaf_count();
        let remote_count = self
            .registry
            .leaf_count()
            .map_err(|e| fetch_failed(local_count, local_count, e))?;

        if remote_count < local_count {
            let remote = self
                .registry
                .current_root()
                .map_err(|e| fetch_failed(remote_count, remote_count, e))?;
            return Err(self.mismatch(tree.root(), remote));
        }
        let missing = remote_count - local_count;
        let available = tree.capacity() - local_count;
        if missing > available {
            return Err(AccumulatorError::TreeFull {
                requested: missing,
                available,
            });
        }

        while tree.leaf_count() < remote_count {
            if self.cancel.load(Ordering::SeqCst) {
                let next_index = tree.leaf_count();
                info!(next_index, total = remote_count, "registry sync cancelled");
                return Ok(SyncStatus::Cancelled { next_index });
            }
            let from = tree.leaf_count();
            let to = remote_count.min(from.saturating_add(self.page_size));
            let page = self
                .registry
                .fetch_leaves(from, to)
                .map_err(|e| fetch_failed(from, to, e))?;
            if page.len() as u64 != to - from {
                return Err(AccumulatorError::RegistryFetchFailed {
                    from,
                    to,
                    reason: format!("expected {} leaves, got {}", to - from, page.len()),
                });
            }
            tree.insert_leaves(&page)?;
            info!(from, to, total = remote_count, "fetched registry page");
        }

        let remote = self
            .registry
            .current_root()
            .map_err(|e| fetch_failed(remote_count, remote_count, e))?;
        let local = tree.root();
        if local != remote {
            return Err(self.mismatch(local, remote));
        }
        info!(root = %local, leaf_count = remote_count, "registry sync complete");
        Ok(SyncStatus::Complete {
            root: local,
            leaf_count: remote_count,
        })
    }

    fn mismatch(&self, local: FieldElement, remote: FieldElement) -> AccumulatorError {
        warn!(local = %local, remote = %remote, "rebuilt tree does not match registry root");
        AccumulatorError::RootMismatch { local, remote }
    }
}

fn fetch_failed(from: u64, to: u64, err: RegistryError) -> AccumulatorError {
    AccumulatorError::RegistryFetchFailed {
        from,
        to,
        reason: err.to_string(),
    }
}
