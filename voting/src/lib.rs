//! Proposal scheduling for the Ember voting surface.
//!
//! Block headers carry a 28-bit voting field. Every active proposal owns a
//! contiguous run of bits over a contiguous run of block heights; this crate
//! keeps the index of those reservations and enforces the one invariant
//! everything else depends on: no two proposals may overlap in both bit
//! space and height space at once.

pub mod error;
pub mod scheduler;
pub mod store;

pub use error::VotingError;
pub use scheduler::ProposalScheduler;
pub use store::{ProposalMetadata, ProposalStore};
