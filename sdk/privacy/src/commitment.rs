//! Coin Commitments
//!
//! ```text
//! cm = SHA256(value || k)
//! ```
//!
//! `value` is the 8-byte big-endian coin value and `k` the 32-byte internal
//! commitment. The result is what gets appended to the commitment tree.

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use crate::constants::{CM_SIZE, K_SIZE, V_SIZE};
use crate::error::{Result, fixed};
use crate::util::hash_pair;

/// A coin commitment (32 bytes)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SchemaRead, SchemaWrite,
)]
pub struct CoinCommitment([u8; CM_SIZE]);

impl CoinCommitment {
    /// Commit to an encoded value and internal commitment
    pub fn new(value: &[u8; V_SIZE], k: &[u8; K_SIZE]) -> Self {
        Self(hash_pair(value, k))
    }

    /// Slice form of [`CoinCommitment::new`]; wrong lengths are rejected
    pub fn from_slices(value: &[u8], k: &[u8]) -> Result<Self> {
        let value: [u8; V_SIZE] = fixed("value", value)?;
        let k: [u8; K_SIZE] = fixed("k", k)?;
        Ok(Self::new(&value, &k))
    }

    /// Wrap an already computed commitment (e.g. a tree leaf)
    pub fn from_bytes(bytes: [u8; CM_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; CM_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for CoinCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
