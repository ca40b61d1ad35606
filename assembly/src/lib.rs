//! Deterministic block assembly for proposal transactions.
//!
//! Given a pool of candidate proposal transactions and a block's proof hash,
//! every honest node must arrive at the identical block: the same candidate
//! order, the same accept/reject decisions, and the same coinbase refund
//! outputs. This crate implements that pipeline — the proof-hash-seeded
//! ordering, the contention-priced fee oracle, and the construction and
//! validation of coinbase refunds.

pub mod coinbase;
pub mod error;
pub mod fee;
pub mod ordering;

pub use coinbase::{
    accepted_proposals, add_refund_to_coinbase, apply_refund_plan, check_refund_transaction,
    refund_output_size, refund_plan, RefundEntry,
};
pub use error::AssemblyError;
pub use fee::{required_fee, resource_usage_heuristic};
pub use ordering::deterministic_ordering;
