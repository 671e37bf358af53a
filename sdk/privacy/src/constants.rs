//! Field widths shared with the spend circuit.

/// Address spend secret `a_sk`
pub const A_SK_SIZE: usize = 32;
/// Address spend public value `a_pk`
pub const A_PK_SIZE: usize = 32;

/// X25519 scalar / point
pub const ENC_KEY_SIZE: usize = 32;

/// `a_pk || pk_enc`
pub const PUBLIC_ADDRESS_SIZE: usize = A_PK_SIZE + ENC_KEY_SIZE;
/// `a_sk || sk_enc`
pub const PRIVATE_ADDRESS_SIZE: usize = A_SK_SIZE + ENC_KEY_SIZE;

/// Serial-number seed `rho`
pub const RHO_SIZE: usize = 32;
/// Commitment trapdoor `r`
pub const R_SIZE: usize = 48;
/// Internal commitment `k`
pub const K_SIZE: usize = 32;
/// Encoded coin value (u64, big-endian)
pub const V_SIZE: usize = 8;
/// Outer coin commitment `cm`
pub const CM_SIZE: usize = 32;

/// Bytes of `H(a_pk || rho)` kept inside `k`
pub const K_TRUNC_SIZE: usize = 16;

/// `value || r || rho`
pub const NOTE_PLAINTEXT_SIZE: usize = V_SIZE + R_SIZE + RHO_SIZE;

/// Pour relation shape
pub const NUM_POUR_INPUTS: usize = 2;
pub const NUM_POUR_OUTPUTS: usize = 2;
