//! Transaction model for the Ember voting engine.
//!
//! Transaction kinds:
//! - **Coinbase**: the block reward transaction; carries proposal refund
//!   outputs appended at assembly time
//! - **Proposal**: embeds a [`VoteProposal`] plus its relay fee
//! - **Transfer**: ordinary value movement (opaque to this engine)
//!
//! The kind is a tagged variant decided at decode time; consensus code
//! matches on it instead of probing with runtime predicates, though the
//! predicates are kept as conveniences for callers that only need a yes/no.

pub mod codec;
pub mod error;
pub mod output;
pub mod proposal;

pub use error::TransactionError;
pub use output::{ScriptPubKey, TxOutput};
pub use proposal::VoteProposal;

use ember_types::Amount;
use serde::{Deserialize, Serialize};

/// The block reward transaction. Refund outputs for proposal transactions
/// are appended to `outputs` during deterministic assembly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseTx {
    /// Height of the block this coinbase rewards.
    pub height: u32,
    pub outputs: Vec<TxOutput>,
}

impl CoinbaseTx {
    /// An empty coinbase for the given height.
    pub fn new(height: u32) -> Self {
        Self {
            height,
            outputs: Vec::new(),
        }
    }
}

/// A proposal-bearing transaction: the embedded proposal plus the plain
/// relay fee the transaction pays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTx {
    pub proposal: VoteProposal,
    pub fee: Amount,
}

impl ProposalTx {
    pub fn new(proposal: VoteProposal, fee: Amount) -> Self {
        Self { proposal, fee }
    }
}

/// An ordinary transfer. The voting engine never looks inside one; it exists
/// so mixed candidate sets decode into something typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTx {
    pub outputs: Vec<TxOutput>,
    pub fee: Amount,
}

/// The unified transaction enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    Coinbase(CoinbaseTx),
    Proposal(ProposalTx),
    Transfer(TransferTx),
}

impl Transaction {
    pub fn is_coinbase(&self) -> bool {
        matches!(self, Self::Coinbase(_))
    }

    pub fn is_proposal(&self) -> bool {
        matches!(self, Self::Proposal(_))
    }

    /// The coinbase payload, if this is a coinbase transaction.
    pub fn as_coinbase(&self) -> Option<&CoinbaseTx> {
        match self {
            Self::Coinbase(tx) => Some(tx),
            _ => None,
        }
    }

    pub fn as_coinbase_mut(&mut self) -> Option<&mut CoinbaseTx> {
        match self {
            Self::Coinbase(tx) => Some(tx),
            _ => None,
        }
    }

    /// This transaction's outputs.
    pub fn outputs(&self) -> &[TxOutput] {
        match self {
            Self::Coinbase(tx) => &tx.outputs,
            Self::Proposal(_) => &[],
            Self::Transfer(tx) => &tx.outputs,
        }
    }
}
