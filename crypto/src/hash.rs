//! Blake2b hashing for proposals and transactions.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ember_types::ProposalHash;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a proposal's canonical byte encoding to produce its `ProposalHash`.
pub fn hash_proposal_bytes(bytes: &[u8]) -> ProposalHash {
    ProposalHash::new(blake2b_256(bytes))
}
