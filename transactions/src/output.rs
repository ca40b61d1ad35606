//! Transaction outputs and the pay-to-address script form.

use ember_crypto::blake2b_256;
use ember_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pay-to-address locking script, reduced to its 20-byte address hash.
///
/// Refund validation compares these byte-for-byte; two outputs paying the
/// same address always carry identical scripts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptPubKey([u8; 20]);

impl ScriptPubKey {
    /// Build the locking script paying to `address`.
    pub fn pay_to_address(address: &Address) -> Self {
        let digest = blake2b_256(address.as_str().as_bytes());
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&digest[..20]);
        Self(hash)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for ScriptPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptPubKey(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

/// A single transaction output: a value locked by a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub value: Amount,
    pub script: ScriptPubKey,
}

impl TxOutput {
    pub fn pay_to_address(value: Amount, address: &Address) -> Self {
        Self {
            value,
            script: ScriptPubKey::pay_to_address(address),
        }
    }
}
