//! The dynamic fee oracle.
//!
//! A proposal pays in proportion to the contention its voting window imposes
//! on the 28-bit surface: linearly in its own width and in the length of each
//! contended region, inversely in the bit headroom left there. The sweep
//! below is consensus-critical down to its integer associativity — the
//! division happens before the multiplication by the gap length, and
//! reordering it changes fees on every node.

use crate::error::AssemblyError;
use ember_transactions::VoteProposal;
use ember_types::params::{BASE_FEE, FEE_SCALE, MAX_BITCOUNT};
use ember_types::Amount;
use ember_voting::ProposalScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    End,
    Start,
}

/// A boundary of one conflicting reservation, on the half-open number line.
#[derive(Clone, Copy, Debug)]
struct SweepEvent {
    pos: u64,
    kind: EventKind,
    width: u8,
}

/// Score the contention of `proposal`'s voting window against the current
/// schedule.
///
/// The window is swept as the half-open interval
/// `[start_height, start_height + check_span)`. Each conflicting reservation
/// contributes a START event at its first block and an END event one past its
/// last; between consecutive events the occupied width is constant and each
/// block contributes `FEE_SCALE * bit_count / (28 - used)`. Subintervals
/// before the first event or after the last carry no contention and are not
/// charged, so an idle surface scores zero.
pub fn resource_usage_heuristic(
    scheduler: &ProposalScheduler,
    proposal: &VoteProposal,
) -> Result<i64, AssemblyError> {
    let window_start = proposal.start_height() as u64;
    let window_end = window_start + proposal.check_span() as u64;
    let bit_count = proposal.bit_count() as i64;

    let conflicts = scheduler.overlapping(&proposal.voting_window());

    let mut events = Vec::with_capacity(conflicts.len() * 2);
    for meta in &conflicts {
        events.push(SweepEvent {
            pos: meta.heights.start() as u64,
            kind: EventKind::Start,
            width: meta.location.bit_count(),
        });
        events.push(SweepEvent {
            pos: meta.heights.end() as u64 + 1,
            kind: EventKind::End,
            width: meta.location.bit_count(),
        });
    }
    events.sort_unstable_by_key(|e| (e.pos, e.kind, e.width));

    let mut used: i64 = 0;
    let mut heuristic: i64 = 0;
    for i in 0..events.len() {
        let event = events[i];
        match event.kind {
            EventKind::Start => used += event.width as i64,
            EventKind::End => used -= event.width as i64,
        }

        if i + 1 == events.len() {
            break;
        }
        if event.pos >= window_end {
            break;
        }

        let seg_start = event.pos.max(window_start);
        let seg_end = events[i + 1].pos.min(window_end);
        if seg_end <= seg_start {
            continue;
        }
        let gap = (seg_end - seg_start) as i64;

        let headroom = MAX_BITCOUNT as i64 - used;
        if headroom <= 0 {
            return Err(AssemblyError::SurfaceExhausted);
        }

        // divide before multiplying by the gap; the order is consensus
        let per_block = (FEE_SCALE * bit_count) / headroom;
        let contribution = per_block.checked_mul(gap).ok_or(AssemblyError::FeeOverflow)?;
        heuristic = heuristic
            .checked_add(contribution)
            .ok_or(AssemblyError::FeeOverflow)?;
    }

    if heuristic < 0 {
        return Err(AssemblyError::FeeOverflow);
    }
    Ok(heuristic)
}

/// The burn a proposal owes: `heuristic * BASE_FEE / FEE_SCALE`.
pub fn required_fee(
    scheduler: &ProposalScheduler,
    proposal: &VoteProposal,
) -> Result<Amount, AssemblyError> {
    let heuristic = resource_usage_heuristic(scheduler, proposal)?;
    let raw = heuristic
        .checked_mul(BASE_FEE.raw())
        .ok_or(AssemblyError::FeeOverflow)?
        / FEE_SCALE;
    Ok(Amount::new(raw))
}
