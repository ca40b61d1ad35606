//! The in-memory index of scheduled proposals.
//!
//! Nothing here persists: the store is rebuilt by replaying the chain at
//! startup, so there is no on-disk format to keep compatible.

use ember_types::{HeightRange, ProposalHash, VoteLocation};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;

/// What the scheduler remembers about one admitted proposal: its identity
/// and the 2D region (bits x heights) it has reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalMetadata {
    pub hash: ProposalHash,
    pub location: VoteLocation,
    pub heights: HeightRange,
}

impl ProposalMetadata {
    /// True if the two reservations collide in both dimensions.
    pub fn conflicts_with(&self, other: &ProposalMetadata) -> bool {
        self.location.bit_overlaps(&other.location) && self.heights.intersects(&other.heights)
    }
}

/// Hash-keyed index of proposal reservations.
#[derive(Clone, Debug, Default)]
pub struct ProposalStore {
    entries: HashMap<ProposalHash, ProposalMetadata>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert by hash. The scheduler is the only caller and has already
    /// checked for conflicts.
    pub fn insert(&mut self, meta: ProposalMetadata) {
        self.entries.insert(meta.hash, meta);
    }

    /// Remove by hash; silently returns if absent.
    pub fn remove(&mut self, hash: &ProposalHash) {
        self.entries.remove(hash);
    }

    pub fn get(&self, hash: &ProposalHash) -> Option<&ProposalMetadata> {
        self.entries.get(hash)
    }

    pub fn contains(&self, hash: &ProposalHash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Scan all entries. Iteration order is not observable to consensus.
    pub fn iter(&self) -> hash_map::Values<'_, ProposalHash, ProposalMetadata> {
        self.entries.values()
    }

    /// A copy of the whole index, for callers that must not hold a live
    /// reference across mutation.
    pub fn snapshot(&self) -> HashMap<ProposalHash, ProposalMetadata> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
