//! # Operation Selector
//!
//! The 4-byte identifier the router dispatches on. A selector is the first
//! four bytes of the Keccak-256 digest of an operation's canonical
//! signature: `name(type1,type2,...)` over the ordered parameter types.
//!
//! Selectors are opaque to the router; only the registry knows which module
//! owns one. Two distinct signatures hashing to the same selector is a
//! correctness hazard the registry rejects at cut time.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Keccak-256 digest of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// A 4-byte operation selector derived from a canonical signature.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// The all-zero selector. Never derived from a real signature in
    /// practice; used as a placeholder for "no operation".
    pub const ZERO: Self = Self([0u8; 4]);

    /// Creates a selector from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Derives the selector for a canonical operation signature.
    ///
    /// The signature must already be canonical: no whitespace, ordered
    /// parameter types, e.g. `transfer(Address,Address,TokenId)`.
    #[must_use]
    pub fn from_signature(signature: &str) -> Self {
        let digest = keccak256(signature.as_bytes());
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&digest[..4]);
        Self(bytes)
    }

    /// Splits raw calldata into selector and payload. Returns None when the
    /// data is shorter than a selector.
    #[must_use]
    pub fn split_calldata(data: &[u8]) -> Option<(Self, &[u8])> {
        if data.len() < 4 {
            return None;
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&data[..4]);
        Some((Self(bytes), &data[4..]))
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 4]> for Selector {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}
