//! The proposal scheduler.
//!
//! A single scheduler instance owns the reservation index. All mutation goes
//! through `add`/`remove`; callers that need find-and-admit atomicity use
//! `schedule`, which holds the one `&mut self` borrow across both steps.
//! Cross-thread sharing is the caller's concern (a coarse mutex around the
//! scheduler); `best_height` is always passed in as a snapshot, never read
//! from ambient state mid-operation.

use crate::error::VotingError;
use crate::store::{ProposalMetadata, ProposalStore};
use ember_transactions::VoteProposal;
use ember_types::params::{MAX_BITCOUNT, MAX_BLOCKS_IN_FUTURE};
use ember_types::{HeightRange, ProposalHash, VoteLocation};
use std::collections::HashMap;

/// Schedules proposals onto the 28-bit voting surface, rejecting any
/// placement that would overlap an existing reservation in both bit space
/// and height space.
#[derive(Clone, Debug, Default)]
pub struct ProposalScheduler {
    store: ProposalStore,
}

impl ProposalScheduler {
    pub fn new() -> Self {
        Self {
            store: ProposalStore::new(),
        }
    }

    /// Whether `proposal` may be admitted, given the current best height.
    ///
    /// A proposal already in the index passes immediately: it was admitted
    /// on-chain before and is simply being re-seen. Otherwise the proposal
    /// must be structurally valid, start within the allowed future window,
    /// and have at least one feasible location on the surface.
    pub fn check_proposal(
        &self,
        proposal: &VoteProposal,
        best_height: u32,
    ) -> Result<(), VotingError> {
        let hash = proposal.hash()?;
        if self.store.contains(&hash) {
            return Ok(());
        }

        proposal.validate()?;

        let start = proposal.start_height();
        let horizon = best_height.saturating_add(MAX_BLOCKS_IN_FUTURE);
        if start <= best_height || start > horizon {
            return Err(VotingError::StartOutOfWindow {
                start,
                best: best_height,
                max: horizon,
            });
        }

        self.next_location(
            proposal.bit_count(),
            proposal.start_height(),
            proposal.check_span(),
        )?;
        Ok(())
    }

    /// Boolean form of [`check_proposal`](Self::check_proposal), for callers
    /// that only gate on the outcome.
    pub fn is_acceptable(&self, proposal: &VoteProposal, best_height: u32) -> bool {
        match self.check_proposal(proposal, best_height) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "proposal failed admission check");
                false
            }
        }
    }

    /// Find the highest free run of `bit_count` bits that stays free for the
    /// whole voting window. Packing is MSB-first: the top of the field fills
    /// up before lower bits are touched.
    pub fn next_location(
        &self,
        bit_count: u8,
        start_height: u32,
        check_span: u32,
    ) -> Result<VoteLocation, VotingError> {
        if bit_count == 0 || bit_count > MAX_BITCOUNT {
            return Err(VotingError::InvalidBitCount(bit_count));
        }

        let window = HeightRange::spanning(start_height, check_span);
        let conflicts = self.overlapping(&window);

        if conflicts.is_empty() {
            return VoteLocation::new(MAX_BITCOUNT - 1, MAX_BITCOUNT - bit_count)
                .map_err(|e| VotingError::Other(e.to_string()));
        }

        let mut available = [true; MAX_BITCOUNT as usize];
        for meta in &conflicts {
            for bit in meta.location.lsb()..=meta.location.msb() {
                available[bit as usize] = false;
            }
        }

        let mut sequential = 0u8;
        for bit in (0..MAX_BITCOUNT).rev() {
            sequential = if available[bit as usize] {
                sequential + 1
            } else {
                0
            };
            if sequential == bit_count {
                return VoteLocation::new(bit + bit_count - 1, bit)
                    .map_err(|e| VotingError::Other(e.to_string()));
            }
        }

        Err(VotingError::NoLocationAvailable)
    }

    /// Admit a proposal whose location has been assigned.
    ///
    /// Re-checks the reservation against every stored entry before touching
    /// the index: either the proposal is fully inserted, or the index is
    /// left exactly as it was.
    pub fn add(&mut self, proposal: &VoteProposal) -> Result<(), VotingError> {
        let meta = ProposalMetadata {
            hash: proposal.hash()?,
            location: proposal.location(),
            heights: proposal.voting_window(),
        };

        for existing in self.store.iter() {
            if meta.conflicts_with(existing) {
                tracing::warn!(
                    proposal = %meta.hash,
                    conflicting = %existing.hash,
                    "proposal position is already occupied during the requested span"
                );
                return Err(VotingError::ScheduleConflict { hash: meta.hash });
            }
        }

        tracing::debug!(
            proposal = %meta.hash,
            location = %meta.location,
            window = %meta.heights,
            "scheduled proposal"
        );
        self.store.insert(meta);
        Ok(())
    }

    /// Find a location for `proposal`, assign it, and admit — atomically
    /// with respect to other proposals, because the whole sequence runs
    /// under one `&mut self` borrow.
    pub fn schedule(
        &mut self,
        proposal: &mut VoteProposal,
        bit_count: u8,
    ) -> Result<VoteLocation, VotingError> {
        let location =
            self.next_location(bit_count, proposal.start_height(), proposal.check_span())?;
        proposal.set_location(location);
        self.add(proposal)?;
        Ok(location)
    }

    /// Drop a reservation. Idempotent.
    pub fn remove(&mut self, hash: &ProposalHash) {
        if self.store.get(hash).is_some() {
            tracing::debug!(proposal = %hash, "removed proposal");
        }
        self.store.remove(hash);
    }

    /// Every proposal whose voting window contains `height`, with its
    /// location. This is the tally module's read surface.
    pub fn active_at(&self, height: u32) -> HashMap<ProposalHash, VoteLocation> {
        self.store
            .iter()
            .filter(|meta| meta.heights.contains(height))
            .map(|meta| (meta.hash, meta.location))
            .collect()
    }

    /// All reservations whose height interval intersects `range`.
    pub fn overlapping(&self, range: &HeightRange) -> Vec<ProposalMetadata> {
        self.store
            .iter()
            .filter(|meta| meta.heights.intersects(range))
            .copied()
            .collect()
    }

    /// Access to the underlying index.
    pub fn store(&self) -> &ProposalStore {
        &self.store
    }
}
