//! Pour Parameters
//!
//! Owns the proving and verification keys for the pour relation. The keys
//! come out of a one-time setup ceremony and are opaque here; the holder only
//! keeps them alive and hands out borrows.
//!
//! ```text
//! relation: 2 input coins, 2 output coins, commitment tree of `tree_depth`
//! lifecycle: new() -> Ready (read-only, shareable) -> drop() releases keys
//! ```

use core::fmt;
use std::sync::Arc;

use zerocash_config::ParamsConfig;

use crate::constants::{NUM_POUR_INPUTS, NUM_POUR_OUTPUTS};
use crate::error::{PrivacyError, Result};

/// Key pair produced by the setup ceremony
#[derive(Debug, Clone)]
pub struct PourKeypair<PK, VK> {
    pub proving_key: PK,
    pub verification_key: VK,
}

impl<PK, VK> PourKeypair<PK, VK> {
    pub fn new(proving_key: PK, verification_key: VK) -> Self {
        Self {
            proving_key,
            verification_key,
        }
    }
}

/// Process-wide proof-system parameters.
///
/// Build once at startup, wrap in an [`Arc`] and pass it to every prover and
/// verifier. Nothing mutates it afterwards, so readers never lock.
pub struct ZerocashParams<PK, VK> {
    tree_depth: u32,
    keypair: PourKeypair<PK, VK>,
}

impl<PK, VK> ZerocashParams<PK, VK> {
    pub const NUM_POUR_INPUTS: usize = NUM_POUR_INPUTS;
    pub const NUM_POUR_OUTPUTS: usize = NUM_POUR_OUTPUTS;

    /// Take ownership of a key pair generated for `tree_depth`.
    ///
    /// The keys are trusted as-is.
    pub fn new(tree_depth: u32, keypair: PourKeypair<PK, VK>) -> Self {
        log::debug!(
            "pour params ready: {}x{} coins, tree depth {}",
            NUM_POUR_INPUTS,
            NUM_POUR_OUTPUTS,
            tree_depth
        );
        Self {
            tree_depth,
            keypair,
        }
    }

    /// Build from a validated [`ParamsConfig`]
    pub fn from_config(config: &ParamsConfig, keypair: PourKeypair<PK, VK>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| PrivacyError::Config(format!("{e:#}")))?;
        Ok(Self::new(config.tree_depth, keypair))
    }

    pub fn tree_depth(&self) -> u32 {
        self.tree_depth
    }

    pub fn proving_key(&self) -> &PK {
        &self.keypair.proving_key
    }

    pub fn verification_key(&self) -> &VK {
        &self.keypair.verification_key
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<PK, VK> fmt::Debug for ZerocashParams<PK, VK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZerocashParams")
            .field("tree_depth", &self.tree_depth)
            .finish_non_exhaustive()
    }
}

impl<PK, VK> Drop for ZerocashParams<PK, VK> {
    fn drop(&mut self) {
        log::debug!("releasing pour keypair (tree depth {})", self.tree_depth);
    }
}
