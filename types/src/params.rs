//! Consensus parameters of the voting engine.
//!
//! Every value here must match across nodes bit-for-bit; a disagreement on
//! any of them forks the chain.

use crate::amount::{Amount, COIN};

/// Maximum length of a proposal name, in bytes.
pub const MAX_CHAR_NAME: usize = 10;

/// Maximum length of a proposal description, in bytes.
pub const MAX_CHAR_ABSTRACT: usize = 30;

/// How far past the current best height a proposal may start voting.
pub const MAX_BLOCKS_IN_FUTURE: u32 = 28_800;

/// Maximum number of blocks a voting window may cover.
pub const MAX_CHECKSPAN: u32 = 28_800;

/// Width of the voting field in block headers: bits `0..=27` of the 32-bit
/// voting word. The top 4 bits are reserved.
pub const MAX_BITCOUNT: u8 = 28;

/// The minimum burn a proposer commits, and the scaling constant of the
/// dynamic fee heuristic.
pub const BASE_FEE: Amount = Amount::new(5 * COIN);

/// Fixed-point scale of the contention heuristic.
pub const FEE_SCALE: i64 = 100_000;

/// Bits consumed from the proof hash per ordering draw.
pub const SEGMENT_SIZE: u32 = 20;

/// Mask selecting one ordering window (`SEGMENT_SIZE` low bits).
pub const SEGMENT_MASK: u64 = 0x000F_FFFF;

/// Current proposal format version.
pub const MOST_RECENT_VERSION: i32 = 1;
