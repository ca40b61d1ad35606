use ember_transactions::TransactionError;
use ember_types::ProposalHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("invalid proposal: {0}")]
    InvalidProposal(#[from] TransactionError),

    #[error("start height {start} must be within ({best}, {max}]")]
    StartOutOfWindow { start: u32, best: u32, max: u32 },

    #[error("bit count {0} must be 1..=28")]
    InvalidBitCount(u8),

    #[error("no free bit run for the requested span")]
    NoLocationAvailable,

    #[error("proposal {hash} would overlap an existing reservation")]
    ScheduleConflict { hash: ProposalHash },

    #[error("{0}")]
    Other(String),
}
