//! Cryptographic primitives for the Ember voting engine.
//!
//! Only hashing lives here; signing and key management belong to the wallet,
//! which is outside this engine.

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, hash_proposal_bytes};
