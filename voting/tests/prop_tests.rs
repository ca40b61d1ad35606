use proptest::prelude::*;

use ember_transactions::VoteProposal;
use ember_types::params::BASE_FEE;
use ember_types::{Address, Amount, HeightRange};
use ember_voting::ProposalScheduler;

fn make_proposal(index: usize, start_height: u32, check_span: u32) -> VoteProposal {
    VoteProposal::new(
        format!("p{index}"),
        start_height,
        check_span,
        "generated proposal",
        Amount::new(BASE_FEE.raw() + index as i64),
        Address::new("emb1qproprefund"),
    )
}

/// One randomized scheduling request.
fn request_strategy() -> impl Strategy<Value = (u8, u32, u32)> {
    (1u8..=6, 0u32..400, 1u32..150)
}

proptest! {
    /// The fundamental invariant: however a sequence of schedule attempts
    /// plays out, no two stored reservations overlap in both bit space and
    /// height space.
    #[test]
    fn no_two_reservations_overlap(requests in prop::collection::vec(request_strategy(), 1..40)) {
        let mut scheduler = ProposalScheduler::new();
        for (i, (bits, start, span)) in requests.into_iter().enumerate() {
            let mut proposal = make_proposal(i, start, span);
            let _ = scheduler.schedule(&mut proposal, bits);
        }

        let entries: Vec<_> = scheduler.store().iter().copied().collect();
        for (i, a) in entries.iter().enumerate() {
            for b in entries.iter().skip(i + 1) {
                prop_assert!(
                    !a.conflicts_with(b),
                    "reservations {} and {} overlap in both dimensions",
                    a.hash,
                    b.hash
                );
            }
        }
    }

    /// Whatever `next_location` returns is immediately admissible.
    #[test]
    fn next_location_is_admissible(
        requests in prop::collection::vec(request_strategy(), 0..25),
        probe in request_strategy(),
    ) {
        let mut scheduler = ProposalScheduler::new();
        for (i, (bits, start, span)) in requests.into_iter().enumerate() {
            let mut proposal = make_proposal(i, start, span);
            let _ = scheduler.schedule(&mut proposal, bits);
        }

        let (bits, start, span) = probe;
        if let Ok(location) = scheduler.next_location(bits, start, span) {
            prop_assert_eq!(location.bit_count(), bits);
            let mut proposal = make_proposal(usize::MAX, start, span);
            proposal.set_location(location);
            prop_assert!(scheduler.clone().add(&proposal).is_ok());
        }
    }

    /// `active_at` returns exactly the reservations whose window contains
    /// the height.
    #[test]
    fn active_at_agrees_with_containment(
        requests in prop::collection::vec(request_strategy(), 1..25),
        height in 0u32..600,
    ) {
        let mut scheduler = ProposalScheduler::new();
        for (i, (bits, start, span)) in requests.into_iter().enumerate() {
            let mut proposal = make_proposal(i, start, span);
            let _ = scheduler.schedule(&mut proposal, bits);
        }

        let active = scheduler.active_at(height);
        for meta in scheduler.store().iter() {
            prop_assert_eq!(meta.heights.contains(height), active.contains_key(&meta.hash));
            if let Some(location) = active.get(&meta.hash) {
                prop_assert_eq!(*location, meta.location);
            }
        }
        prop_assert!(active.len() <= scheduler.store().len());
    }

    /// Remove after add returns the index to its prior state.
    #[test]
    fn remove_undoes_add((bits, start, span) in request_strategy()) {
        let mut scheduler = ProposalScheduler::new();
        let mut anchor = make_proposal(0, 100, 50);
        scheduler.schedule(&mut anchor, 2).unwrap();
        let before = scheduler.store().snapshot();

        let mut proposal = make_proposal(1, start, span);
        if scheduler.schedule(&mut proposal, bits).is_ok() {
            scheduler.remove(&proposal.hash().unwrap());
        }

        prop_assert_eq!(scheduler.store().snapshot(), before);
    }

    /// MSB-first packing: on an empty surface the top of the field is always
    /// handed out first.
    #[test]
    fn empty_surface_packs_from_the_top((bits, start, span) in request_strategy()) {
        let scheduler = ProposalScheduler::new();
        let location = scheduler.next_location(bits, start, span).unwrap();
        prop_assert_eq!(location.msb(), 27);
        prop_assert_eq!(location.lsb(), 28 - bits);
    }

    /// Overlap queries agree with plain interval arithmetic.
    #[test]
    fn overlapping_matches_intersection(
        requests in prop::collection::vec(request_strategy(), 1..25),
        probe_start in 0u32..600,
        probe_span in 1u32..150,
    ) {
        let mut scheduler = ProposalScheduler::new();
        for (i, (bits, start, span)) in requests.into_iter().enumerate() {
            let mut proposal = make_proposal(i, start, span);
            let _ = scheduler.schedule(&mut proposal, bits);
        }

        let probe = HeightRange::spanning(probe_start, probe_span);
        let overlapping = scheduler.overlapping(&probe);
        let expected = scheduler
            .store()
            .iter()
            .filter(|meta| meta.heights.intersects(&probe))
            .count();
        prop_assert_eq!(overlapping.len(), expected);
        for meta in &overlapping {
            prop_assert!(meta.heights.intersects(&probe));
        }
    }
}
