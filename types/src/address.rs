//! Refund address type with `emb1` prefix.

use crate::error::EmberError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An Ember address, always prefixed with `emb1`.
///
/// Carried on proposals as the refund destination. This engine only validates
/// structure; checksumming belongs to the wallet layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all Ember addresses.
    pub const PREFIX: &'static str = "emb1";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `emb1`. Use [`Address::parse`]
    /// at trust boundaries.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with emb1");
        Self(s)
    }

    /// Parse an address from untrusted input.
    pub fn parse(raw: &str) -> Result<Self, EmberError> {
        let candidate = Self(raw.to_string());
        if candidate.is_valid() {
            Ok(candidate)
        } else {
            Err(EmberError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    ///
    /// Deserialized addresses bypass [`Address::new`], so consensus paths
    /// must re-check before paying to one.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
