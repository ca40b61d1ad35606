//! Proof-hash-seeded deterministic ordering of candidate transactions.
//!
//! Block producers and validators must process proposal candidates in the
//! same sequence or their accept/reject decisions (and therefore the
//! coinbase) diverge. The proof hash seeds a Fisher-Yates-style draw:
//! 20-bit windows of the hash pick, one at a time, which remaining candidate
//! goes next. Candidates are first canonicalized by their encoding digest so
//! the result is a function of the candidate *set*, not of the order the
//! mempool happened to yield them in.

use crate::error::AssemblyError;
use ember_crypto::blake2b_256;
use ember_transactions::{codec, Transaction};
use ember_types::params::{SEGMENT_MASK, SEGMENT_SIZE};
use ember_types::ProofHash;

/// Reorder `candidates` into the canonical sequence for the block whose
/// proof is `proof_hash`. The result is a permutation of the input, and the
/// same `(proof_hash, candidate set)` always yields the same sequence.
pub fn deterministic_ordering(
    proof_hash: &ProofHash,
    candidates: Vec<Transaction>,
) -> Result<Vec<Transaction>, AssemblyError> {
    let mut keyed = candidates
        .into_iter()
        .map(|tx| {
            let digest = blake2b_256(&codec::encode(&tx)?);
            Ok((digest, tx))
        })
        .collect::<Result<Vec<_>, AssemblyError>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut remaining: Vec<Transaction> = keyed.into_iter().map(|(_, tx)| tx).collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut segment_offset: u32 = 0;

    while !remaining.is_empty() {
        let window = window_at(proof_hash, segment_offset);
        let index = (window % remaining.len() as u64) as usize;
        ordered.push(remaining.remove(index));
        segment_offset = (segment_offset + SEGMENT_SIZE) % 256;
    }

    Ok(ordered)
}

/// Read the `SEGMENT_SIZE`-bit window of the proof hash starting at
/// `bit_offset`. Bits past the end of the hash read as zero.
fn window_at(proof_hash: &ProofHash, bit_offset: u32) -> u64 {
    let mut window = 0u64;
    for i in 0..SEGMENT_SIZE {
        window |= proof_hash.bit(bit_offset + i) << i;
    }
    window & SEGMENT_MASK
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_transactions::{ProposalTx, VoteProposal};
    use ember_types::{Address, Amount};

    fn make_candidate(name: &str) -> Transaction {
        let proposal = VoteProposal::new(
            name,
            2000,
            100,
            "ordering test",
            Amount::from_coins(6),
            Address::new("emb1qorder"),
        );
        Transaction::Proposal(ProposalTx::new(proposal, Amount::new(1)))
    }

    fn proof(low_byte: u8) -> ProofHash {
        let mut bytes = [0u8; 32];
        bytes[0] = low_byte;
        ProofHash::new(bytes)
    }

    #[test]
    fn empty_candidates_give_empty_order() {
        let ordered = deterministic_ordering(&proof(1), Vec::new()).unwrap();
        assert!(ordered.is_empty());
    }

    #[test]
    fn single_candidate_passes_through() {
        let tx = make_candidate("only");
        let ordered = deterministic_ordering(&proof(0x5a), vec![tx.clone()]).unwrap();
        assert_eq!(ordered, vec![tx]);
    }

    #[test]
    fn ordering_is_a_permutation() {
        let candidates = vec![
            make_candidate("a"),
            make_candidate("b"),
            make_candidate("c"),
            make_candidate("d"),
        ];
        let ordered = deterministic_ordering(&proof(0xc3), candidates.clone()).unwrap();
        assert_eq!(ordered.len(), candidates.len());
        for tx in &candidates {
            assert!(ordered.contains(tx));
        }
    }

    #[test]
    fn same_inputs_same_order() {
        let candidates = vec![make_candidate("a"), make_candidate("b"), make_candidate("c")];
        let first = deterministic_ordering(&proof(1), candidates.clone()).unwrap();
        let second = deterministic_ordering(&proof(1), candidates).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = make_candidate("a");
        let b = make_candidate("b");
        let c = make_candidate("c");

        let forward =
            deterministic_ordering(&proof(7), vec![a.clone(), b.clone(), c.clone()]).unwrap();
        let shuffled = deterministic_ordering(&proof(7), vec![c, a, b]).unwrap();
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn different_proofs_usually_disagree() {
        let candidates: Vec<_> = (0..8)
            .map(|i| make_candidate(&format!("p{i}")))
            .collect();
        let one = deterministic_ordering(&proof(1), candidates.clone()).unwrap();
        let other = deterministic_ordering(&proof(0xff), candidates).unwrap();
        assert_ne!(one, other);
    }

    #[test]
    fn window_reads_low_bits_first() {
        // byte 0 = 0b0000_0101 -> window at offset 0 is 5
        let hash = proof(0b0000_0101);
        assert_eq!(window_at(&hash, 0), 5);
        // shifted off after one bit
        assert_eq!(window_at(&hash, 1), 2);
    }

    #[test]
    fn window_past_hash_end_is_zero() {
        let mut bytes = [0xffu8; 32];
        bytes[31] = 0xff;
        let hash = ProofHash::new(bytes);
        // offset 240 reads the last 16 real bits then zero padding
        assert_eq!(window_at(&hash, 240), 0xffff);
    }

    #[test]
    fn draw_walks_the_hash_windows() {
        // proof hash = ...0001: first window 1, every later window 0.
        // Canonical candidate order is by digest; the first draw takes
        // index 1 % 3, each following draw takes index 0.
        let candidates = vec![make_candidate("a"), make_candidate("b"), make_candidate("c")];

        let mut keyed: Vec<_> = candidates
            .iter()
            .map(|tx| (blake2b_256(&codec::encode(tx).unwrap()), tx.clone()))
            .collect();
        keyed.sort_by(|x, y| x.0.cmp(&y.0));
        let canonical: Vec<_> = keyed.into_iter().map(|(_, tx)| tx).collect();

        let expected = vec![canonical[1].clone(), canonical[0].clone(), canonical[2].clone()];
        let ordered = deterministic_ordering(&proof(1), candidates).unwrap();
        assert_eq!(ordered, expected);
    }
}
