//! Canonical byte encoding for transactions and proposals.
//!
//! Everything consensus-relevant goes through bincode: proposal hashes are
//! computed over these bytes, and block builders size coinbase deltas with
//! `serialized_size`. Changing the encoding is a hard fork.

use crate::error::TransactionError;
use crate::{Transaction, VoteProposal};
use ember_types::Amount;

/// Encode a transaction for transmission or hashing.
pub fn encode(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    bincode::serialize(tx).map_err(|e| TransactionError::Serialization(e.to_string()))
}

/// Decode a transaction from raw bytes.
pub fn decode(data: &[u8]) -> Result<Transaction, TransactionError> {
    bincode::deserialize(data).map_err(|e| TransactionError::DecodeFailure(e.to_string()))
}

/// Canonical byte length of a serialized transaction.
pub fn serialized_size(tx: &Transaction) -> Result<u64, TransactionError> {
    bincode::serialized_size(tx).map_err(|e| TransactionError::Serialization(e.to_string()))
}

/// The canonical encoding of a proposal — the preimage of its hash.
pub fn proposal_bytes(proposal: &VoteProposal) -> Result<Vec<u8>, TransactionError> {
    bincode::serialize(proposal).map_err(|e| TransactionError::Serialization(e.to_string()))
}

/// Extract the proposal and its relay fee from a candidate transaction.
///
/// Fails with [`TransactionError::DecodeFailure`] when the transaction is not
/// a proposal carrier or the embedded payload is empty.
pub fn proposal_from_transaction(
    tx: &Transaction,
) -> Result<(&VoteProposal, Amount), TransactionError> {
    match tx {
        Transaction::Proposal(ptx) if !ptx.proposal.is_null() => {
            Ok((&ptx.proposal, ptx.fee))
        }
        Transaction::Proposal(_) => Err(TransactionError::DecodeFailure(
            "embedded proposal is null".to_string(),
        )),
        _ => Err(TransactionError::DecodeFailure(
            "transaction does not carry a proposal".to_string(),
        )),
    }
}
