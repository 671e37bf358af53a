//! Zerocash Privacy SDK
//!
//! Coins, addresses and commitments for a Zerocash-style shielded pool.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Address                                │
//! │   PrivateAddress { a_sk, sk_enc }  ──►  PublicAddress { a_pk,   │
//! │                                                        pk_enc } │
//! └─────────────────────────────────────────────────────────────────┘
//!          │ recover(EncryptedNote)            │ mint(value)
//!          ▼                                   ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Coin { addr_pk, cm, rho, r, k, coin_value }                    │
//! │    k  = SHA256(r || SHA256(a_pk || rho)[..16])                  │
//! │    cm = SHA256(coin_value || k)       ──►  commitment tree      │
//! └─────────────────────────────────────────────────────────────────┘
//!          │ spend_witness(owner)
//!          ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Pour proof (external), keys held by ZerocashParams             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod address;
pub mod coin;
pub mod commitment;
pub mod constants;
pub mod encryption;
pub mod error;
pub mod params;
pub mod util;

pub use address::{Address, AddressPrf, PrivateAddress, PublicAddress, Sha256AddressPrf};
pub use coin::{Coin, SpendWitness};
pub use commitment::CoinCommitment;
pub use encryption::{EncryptedNote, EncryptionPublicKey, EncryptionSecretKey};
pub use error::{PrivacyError, Result};
pub use params::{PourKeypair, ZerocashParams};
