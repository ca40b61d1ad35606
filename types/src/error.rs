//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for Ember core types.
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("invalid vote location: msb {msb}, lsb {lsb} (field is bits 0..=27)")]
    InvalidLocation { msb: u8, lsb: u8 },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}
