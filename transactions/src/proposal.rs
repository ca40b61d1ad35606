//! Vote proposals — the user-authored payload of a proposal transaction.

use crate::error::TransactionError;
use crate::{codec, ProposalTx};
use ember_types::params::{
    BASE_FEE, MAX_CHAR_ABSTRACT, MAX_CHAR_NAME, MAX_CHECKSPAN, MOST_RECENT_VERSION,
};
use ember_types::{Address, Amount, HeightRange, ProposalHash, VoteLocation};
use serde::{Deserialize, Serialize};

/// A proposal to put a question to an on-chain vote.
///
/// Created once by a user; the location is assigned by the scheduler when the
/// network prices and admits the proposal, and the struct is immutable after
/// that. Field order is the wire order — the proposal hash is the Blake2b-256
/// digest of the canonical encoding of exactly this sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteProposal {
    version: i32,
    max_fee: Amount,
    name: String,
    start_height: u32,
    check_span: u32,
    description: String,
    location: VoteLocation,
    refund_address: Address,
}

impl VoteProposal {
    /// Create a proposal at the current format version. The location starts
    /// as the placeholder; scheduling assigns the real one.
    pub fn new(
        name: impl Into<String>,
        start_height: u32,
        check_span: u32,
        description: impl Into<String>,
        max_fee: Amount,
        refund_address: Address,
    ) -> Self {
        Self {
            version: MOST_RECENT_VERSION,
            max_fee,
            name: name.into(),
            start_height,
            check_span,
            description: description.into(),
            location: VoteLocation::default(),
            refund_address,
        }
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_height(&self) -> u32 {
        self.start_height
    }

    pub fn check_span(&self) -> u32 {
        self.check_span
    }

    /// Last block (inclusive) on which votes count.
    pub fn end_height(&self) -> u32 {
        self.voting_window().end()
    }

    /// The inclusive block interval this proposal collects votes over.
    pub fn voting_window(&self) -> HeightRange {
        HeightRange::spanning(self.start_height, self.check_span)
    }

    pub fn location(&self) -> VoteLocation {
        self.location
    }

    /// Number of voting-field bits this proposal reserves.
    pub fn bit_count(&self) -> u8 {
        self.location.bit_count()
    }

    pub fn max_fee(&self) -> Amount {
        self.max_fee
    }

    pub fn refund_address(&self) -> &Address {
        &self.refund_address
    }

    /// Assign the scheduled location. Called exactly once, by the scheduler.
    pub fn set_location(&mut self, location: VoteLocation) {
        self.location = location;
    }

    /// An empty proposal (never constructed by users; decode can produce one).
    pub fn is_null(&self) -> bool {
        self.name.is_empty()
    }

    /// The proposal's identity: Blake2b-256 over the canonical encoding.
    pub fn hash(&self) -> Result<ProposalHash, TransactionError> {
        let bytes = codec::proposal_bytes(self)?;
        Ok(ember_crypto::hash_proposal_bytes(&bytes))
    }

    /// Structural validity: field lengths, span bound, fee floor, address
    /// shape. Chain-relative checks (height window, slot feasibility) belong
    /// to the scheduler.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.name.is_empty() || self.name.len() > MAX_CHAR_NAME {
            return Err(TransactionError::InvalidName(self.name.len()));
        }
        if self.description.is_empty() || self.description.len() > MAX_CHAR_ABSTRACT {
            return Err(TransactionError::InvalidDescription(self.description.len()));
        }
        if self.check_span == 0 || self.check_span > MAX_CHECKSPAN {
            return Err(TransactionError::InvalidCheckSpan(self.check_span));
        }
        if self.max_fee < BASE_FEE {
            return Err(TransactionError::FeeBelowBase {
                offered: self.max_fee,
                minimum: BASE_FEE,
            });
        }
        if !self.refund_address.is_valid() {
            return Err(TransactionError::BadAddress(
                self.refund_address.as_str().to_string(),
            ));
        }
        Ok(())
    }

    /// Wrap this proposal in a broadcastable transaction paying `fee` in
    /// relay fees. Signing happens in the wallet, outside this engine.
    pub fn construct_transaction(self, fee: Amount) -> ProposalTx {
        ProposalTx::new(self, fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_proposal() -> VoteProposal {
        VoteProposal::new(
            "upgrade",
            2000,
            100,
            "raise the block size",
            Amount::from_coins(6),
            Address::new("emb1qq5r3nqtz7slkjw"),
        )
    }

    // ── Structure ──────────────────────────────────────────────────────

    #[test]
    fn new_uses_current_version() {
        assert_eq!(make_proposal().version(), MOST_RECENT_VERSION);
    }

    #[test]
    fn voting_window_is_inclusive() {
        let p = make_proposal();
        assert_eq!(p.start_height(), 2000);
        assert_eq!(p.end_height(), 2099);
        assert_eq!(p.voting_window().block_count(), 100);
    }

    #[test]
    fn set_location_updates_bit_count() {
        let mut p = make_proposal();
        p.set_location(VoteLocation::new(27, 26).unwrap());
        assert_eq!(p.bit_count(), 2);
        assert_eq!(p.location().msb(), 27);
    }

    #[test]
    fn is_null_tracks_name() {
        let mut p = make_proposal();
        assert!(!p.is_null());
        p.name.clear();
        assert!(p.is_null());
    }

    // ── Hashing ────────────────────────────────────────────────────────

    #[test]
    fn hash_is_deterministic() {
        let p = make_proposal();
        assert_eq!(p.hash().unwrap(), p.hash().unwrap());
    }

    #[test]
    fn hash_covers_every_field() {
        let base = make_proposal();
        let base_hash = base.hash().unwrap();

        let mut renamed = base.clone();
        renamed.name = "upgrade2".into();
        assert_ne!(renamed.hash().unwrap(), base_hash);

        let mut moved = base.clone();
        moved.start_height += 1;
        assert_ne!(moved.hash().unwrap(), base_hash);

        let mut relocated = base.clone();
        relocated.set_location(VoteLocation::new(5, 4).unwrap());
        assert_ne!(relocated.hash().unwrap(), base_hash);
    }

    // ── Validation ─────────────────────────────────────────────────────

    #[test]
    fn valid_proposal_passes() {
        assert!(make_proposal().validate().is_ok());
    }

    #[test]
    fn name_length_bounds() {
        let mut p = make_proposal();
        p.name = String::new();
        assert!(matches!(
            p.validate().unwrap_err(),
            TransactionError::InvalidName(0)
        ));

        p.name = "elevenchars".into(); // 11 bytes
        assert!(matches!(
            p.validate().unwrap_err(),
            TransactionError::InvalidName(11)
        ));

        p.name = "tencharlong".chars().take(10).collect();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn description_length_bounds() {
        let mut p = make_proposal();
        p.description = "x".repeat(31);
        assert!(matches!(
            p.validate().unwrap_err(),
            TransactionError::InvalidDescription(31)
        ));

        p.description = "x".repeat(30);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn check_span_bounds() {
        let mut p = make_proposal();
        p.check_span = 0;
        assert!(p.validate().is_err());

        p.check_span = MAX_CHECKSPAN;
        assert!(p.validate().is_ok());

        p.check_span = MAX_CHECKSPAN + 1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn max_fee_floor() {
        let mut p = make_proposal();
        p.max_fee = BASE_FEE;
        assert!(p.validate().is_ok());

        p.max_fee = Amount::new(BASE_FEE.raw() - 1);
        assert!(matches!(
            p.validate().unwrap_err(),
            TransactionError::FeeBelowBase { .. }
        ));
    }

    #[test]
    fn construct_transaction_carries_fee() {
        let tx = make_proposal().construct_transaction(Amount::new(5));
        assert_eq!(tx.fee, Amount::new(5));
        assert_eq!(tx.proposal.name(), "upgrade");
    }
}
