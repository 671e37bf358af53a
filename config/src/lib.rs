//! Zerocash Configuration
//!
//! Configuration object for the note layer. It is built explicitly, either
//! from a TOML string or from a file path chosen by the caller, and passed
//! down to whatever needs it. There is no global instance.
//!
//! ```toml
//! [params]
//! tree_depth = 20
//! proving_key_path = "keys/pour.pk"
//! verifying_key_path = "keys/pour.vk"
//! ```

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_TREE_DEPTH: u32 = 20;
const MAX_TREE_DEPTH: u32 = 64;

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZerocashConfig {
    #[serde(default)]
    pub params: ParamsConfig,
}

/// Proof-system parameter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsConfig {
    /// Depth of the commitment tree the pour relation was generated for
    #[serde(default = "default_tree_depth")]
    pub tree_depth: u32,
    /// Where the setup ceremony wrote the proving key
    #[serde(default)]
    pub proving_key_path: Option<String>,
    /// Where the setup ceremony wrote the verification key
    #[serde(default)]
    pub verifying_key_path: Option<String>,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            tree_depth: DEFAULT_TREE_DEPTH,
            proving_key_path: None,
            verifying_key_path: None,
        }
    }
}

fn default_tree_depth() -> u32 {
    DEFAULT_TREE_DEPTH
}

// ============================================================================
// Loading
// ============================================================================

impl ZerocashConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

impl ParamsConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_TREE_DEPTH).contains(&self.tree_depth),
            "tree_depth must be between 1 and {MAX_TREE_DEPTH}, got {}",
            self.tree_depth
        );
        Ok(())
    }
}
