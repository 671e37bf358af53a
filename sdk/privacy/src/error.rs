//! Privacy SDK errors

use thiserror::Error;

/// Errors produced by address, coin and note-encryption operations
#[derive(Debug, Error)]
pub enum PrivacyError {
    /// The random source could not produce bytes. Never retried.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("note decryption failed")]
    DecryptionFailed,

    #[error("note encryption failed")]
    EncryptionFailed,

    #[error("invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("note plaintext too short: got {len} bytes")]
    MalformedPlaintext { len: usize },

    #[error("coin commitments do not match its contents")]
    InconsistentCoin,

    #[error("recovered coin does not match the expected commitment")]
    CommitmentMismatch,

    #[error("address does not own this coin")]
    WrongOwner,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization failed")]
    Serialization,
}

pub type Result<T> = core::result::Result<T, PrivacyError>;

/// Copy a slice into a fixed-width array, rejecting any other length.
pub(crate) fn fixed<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| PrivacyError::InvalidLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}
