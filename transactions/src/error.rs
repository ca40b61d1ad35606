use ember_types::Amount;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("proposal name must be 1..=10 bytes, got {0}")]
    InvalidName(usize),

    #[error("proposal description must be 1..=30 bytes, got {0}")]
    InvalidDescription(usize),

    #[error("check span must be 1..=28800 blocks, got {0}")]
    InvalidCheckSpan(u32),

    #[error("max fee {offered} is below the base fee {minimum}")]
    FeeBelowBase { offered: Amount, minimum: Amount },

    #[error("bad refund address: {0}")]
    BadAddress(String),

    #[error("transaction is not a coinbase")]
    NotCoinbase,

    #[error("transaction did not contain a parseable proposal: {0}")]
    DecodeFailure(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
