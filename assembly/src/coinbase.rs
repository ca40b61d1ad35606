//! Coinbase refund construction and validation.
//!
//! Every proposal transaction in a block gets exactly one refund output
//! appended to the coinbase: the proposer's `max_fee` minus the relay fee,
//! and minus the required burn when the proposal was accepted. Producer and
//! validator run the identical walk over the deterministically ordered
//! candidates, so a validator can rebuild the refund tail from scratch and
//! reject any block whose coinbase disagrees.

use crate::error::AssemblyError;
use crate::fee;
use ember_transactions::{codec, CoinbaseTx, Transaction, TxOutput, VoteProposal};
use ember_types::Amount;
use ember_voting::{ProposalScheduler, VotingError};

/// One step of the deterministic refund walk: the proposal as the walk
/// priced it (location assigned when one was found), what it owes, and
/// whether it was accepted.
#[derive(Clone, Debug)]
pub struct RefundEntry {
    pub proposal: VoteProposal,
    pub required_fee: Amount,
    pub tx_fee: Amount,
    pub accepted: bool,
    /// Index of the originating transaction in the ordered candidate list.
    pub candidate_index: usize,
}

/// Walk the ordered candidates and decide, for each, its location, price,
/// and acceptance.
///
/// The walk runs against a clone of the scheduler: each accepted proposal is
/// admitted into the clone so later candidates see its contention, while the
/// live index stays untouched. A candidate with no feasible location is
/// rejected but still owes its entry (it gets the unaccepted refund).
pub fn refund_plan(
    scheduler: &ProposalScheduler,
    ordered: &[Transaction],
) -> Result<Vec<RefundEntry>, AssemblyError> {
    let mut working = scheduler.clone();
    let mut plan = Vec::with_capacity(ordered.len());

    for (candidate_index, tx) in ordered.iter().enumerate() {
        let (proposal, tx_fee) = codec::proposal_from_transaction(tx)?;
        let mut proposal = proposal.clone();

        match working.next_location(
            proposal.bit_count(),
            proposal.start_height(),
            proposal.check_span(),
        ) {
            Ok(location) => {
                proposal.set_location(location);
                let required_fee = fee::required_fee(&working, &proposal)?;
                let accepted = required_fee <= proposal.max_fee();
                if accepted {
                    working.add(&proposal)?;
                } else {
                    tracing::debug!(
                        required = %required_fee,
                        authorized = %proposal.max_fee(),
                        "proposal rejected: required fee exceeds authorized maximum"
                    );
                }
                plan.push(RefundEntry {
                    proposal,
                    required_fee,
                    tx_fee,
                    accepted,
                    candidate_index,
                });
            }
            Err(VotingError::NoLocationAvailable) => {
                tracing::debug!(
                    start = proposal.start_height(),
                    span = proposal.check_span(),
                    "proposal rejected: no free bit run for its window"
                );
                plan.push(RefundEntry {
                    proposal,
                    required_fee: Amount::ZERO,
                    tx_fee,
                    accepted: false,
                    candidate_index,
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(plan)
}

/// The candidates a block must include, in order: every ordered proposal
/// transaction the deterministic walk accepts.
pub fn accepted_proposals(
    scheduler: &ProposalScheduler,
    ordered: &[Transaction],
) -> Result<Vec<Transaction>, AssemblyError> {
    let plan = refund_plan(scheduler, ordered)?;
    Ok(plan
        .into_iter()
        .filter(|entry| entry.accepted)
        .map(|entry| ordered[entry.candidate_index].clone())
        .collect())
}

/// Synthesize the refund output a proposal is owed.
///
/// The refund is `max_fee - required_fee - tx_fee` when the proposal was
/// accepted (the required burn stays destroyed), or `max_fee - tx_fee` when
/// it was not. Fails if the refund address is malformed or the value would
/// go negative.
fn refund_output(
    proposal: &VoteProposal,
    required_fee: Amount,
    tx_fee: Amount,
    accepted: bool,
) -> Result<TxOutput, AssemblyError> {
    let address = proposal.refund_address();
    if !address.is_valid() {
        return Err(AssemblyError::BadAddress(address.as_str().to_string()));
    }

    let mut value = proposal
        .max_fee()
        .checked_sub(tx_fee)
        .ok_or(AssemblyError::FeeOverflow)?;
    if accepted {
        value = value
            .checked_sub(required_fee)
            .ok_or(AssemblyError::FeeOverflow)?;
    }
    if value.is_negative() {
        return Err(AssemblyError::FeeOverflow);
    }

    Ok(TxOutput::pay_to_address(value, address))
}

/// Append one refund output to `coinbase` for `proposal`.
///
/// Fails if the target is not a coinbase, the refund address is malformed,
/// or the refund value would go negative; a failed append leaves the
/// coinbase untouched.
pub fn add_refund_to_coinbase(
    proposal: &VoteProposal,
    required_fee: Amount,
    tx_fee: Amount,
    accepted: bool,
    coinbase: &mut Transaction,
) -> Result<(), AssemblyError> {
    let output = refund_output(proposal, required_fee, tx_fee, accepted)?;
    let coinbase = coinbase
        .as_coinbase_mut()
        .ok_or(AssemblyError::NotCoinbase)?;
    coinbase.outputs.push(output);
    Ok(())
}

/// Append the whole plan's refund outputs to `coinbase`, in walk order.
pub fn apply_refund_plan(
    plan: &[RefundEntry],
    coinbase: &mut Transaction,
) -> Result<(), AssemblyError> {
    for entry in plan {
        add_refund_to_coinbase(
            &entry.proposal,
            entry.required_fee,
            entry.tx_fee,
            entry.accepted,
            coinbase,
        )?;
    }
    Ok(())
}

/// Validate a block's coinbase against the deterministic reconstruction.
///
/// Rebuilds the expected refund outputs by re-running the walk over
/// `ordered`, then compares them position-by-position against the tail of
/// the actual coinbase. Script hash and value must both match exactly;
/// any disagreement rejects the block.
pub fn check_refund_transaction(
    scheduler: &ProposalScheduler,
    ordered: &[Transaction],
    coinbase: &Transaction,
) -> Result<(), AssemblyError> {
    let actual = coinbase.as_coinbase().ok_or(AssemblyError::NotCoinbase)?;

    let plan = refund_plan(scheduler, ordered)?;
    let expected = plan
        .iter()
        .map(|entry| {
            refund_output(
                &entry.proposal,
                entry.required_fee,
                entry.tx_fee,
                entry.accepted,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    if actual.outputs.len() < expected.len() {
        return Err(AssemblyError::RefundCountMismatch {
            expected: expected.len(),
            actual: actual.outputs.len(),
        });
    }

    let tail_start = actual.outputs.len() - expected.len();
    for (index, (have, want)) in actual.outputs[tail_start..]
        .iter()
        .zip(expected.iter())
        .enumerate()
    {
        if have.value != want.value || have.script != want.script {
            tracing::warn!(
                index,
                have_value = %have.value,
                want_value = %want.value,
                "coinbase refund output disagrees with reconstruction"
            );
            return Err(AssemblyError::RefundMismatch { index });
        }
    }

    Ok(())
}

/// Byte delta one refund output adds to a serialized coinbase, so block
/// builders can reserve space before assembling.
pub fn refund_output_size(tx_proposal: &Transaction) -> Result<u64, AssemblyError> {
    let (proposal, _) = codec::proposal_from_transaction(tx_proposal)?;

    let mut probe = Transaction::Coinbase(CoinbaseTx::new(0));
    let empty_size = codec::serialized_size(&probe)?;
    add_refund_to_coinbase(proposal, Amount::ZERO, Amount::ZERO, false, &mut probe)?;
    let with_refund = codec::serialized_size(&probe)?;

    Ok(with_refund - empty_size)
}
