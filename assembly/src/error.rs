use ember_transactions::TransactionError;
use ember_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("transaction is not a coinbase")]
    NotCoinbase,

    #[error("bad refund address: {0}")]
    BadAddress(String),

    #[error("fee computation overflowed or went negative")]
    FeeOverflow,

    #[error("voting surface is fully consumed over the priced interval")]
    SurfaceExhausted,

    #[error("coinbase refund output {index} disagrees with the deterministic reconstruction")]
    RefundMismatch { index: usize },

    #[error("coinbase carries {actual} refund outputs, expected {expected}")]
    RefundCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Decode(#[from] TransactionError),

    #[error(transparent)]
    Voting(#[from] VotingError),
}
