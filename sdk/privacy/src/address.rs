//! Addresses
//!
//! An address pairs a spend key with an encryption key.
//!
//! ```text
//! PrivateAddress = { a_sk: [u8; 32], sk_enc }     // never leaves the owner
//! PublicAddress  = { a_pk: [u8; 32], pk_enc }     // handed to senders
//!
//! a_pk   = PRF_addr(a_sk)       (default: SHA256(a_sk || 0^256))
//! pk_enc = X25519(sk_enc)
//! ```

use core::fmt;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use crate::constants::{
    A_PK_SIZE, A_SK_SIZE, ENC_KEY_SIZE, PRIVATE_ADDRESS_SIZE, PUBLIC_ADDRESS_SIZE,
};
use crate::encryption::{self, EncryptionPublicKey, EncryptionSecretKey};
use crate::error::{PrivacyError, Result, fixed};
use crate::util::hash_pair;

/// One-way map from the spend secret `a_sk` to the public `a_pk`.
///
/// The spend circuit evaluates the same function, so swapping it changes
/// every address and every coin commitment.
pub trait AddressPrf {
    fn derive(&self, a_sk: &[u8; A_SK_SIZE]) -> [u8; A_PK_SIZE];
}

/// `a_pk = SHA256(a_sk || 0^256)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256AddressPrf;

impl AddressPrf for Sha256AddressPrf {
    fn derive(&self, a_sk: &[u8; A_SK_SIZE]) -> [u8; A_PK_SIZE] {
        hash_pair(a_sk, &[0u8; 32])
    }
}

/// Secret half of an address
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
pub struct PrivateAddress {
    a_sk: [u8; A_SK_SIZE],
    sk_enc: EncryptionSecretKey,
}

impl PrivateAddress {
    /// Sample a fresh spend secret and encryption key pair
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut a_sk = [0u8; A_SK_SIZE];
        rng.try_fill_bytes(&mut a_sk)?;
        let (sk_enc, _) = encryption::keygen(rng)?;

        Ok(Self { a_sk, sk_enc })
    }

    pub fn from_parts(a_sk: [u8; A_SK_SIZE], sk_enc: EncryptionSecretKey) -> Self {
        Self { a_sk, sk_enc }
    }

    /// Restore from raw slices, rejecting wrong lengths
    pub fn from_slices(a_sk: &[u8], sk_enc: &[u8]) -> Result<Self> {
        Ok(Self {
            a_sk: fixed("a_sk", a_sk)?,
            sk_enc: EncryptionSecretKey::from_bytes(fixed::<ENC_KEY_SIZE>("sk_enc", sk_enc)?),
        })
    }

    /// Fixed layout: `a_sk || sk_enc`
    pub fn to_bytes(&self) -> [u8; PRIVATE_ADDRESS_SIZE] {
        let mut out = [0u8; PRIVATE_ADDRESS_SIZE];
        out[..A_SK_SIZE].copy_from_slice(&self.a_sk);
        out[A_SK_SIZE..].copy_from_slice(self.sk_enc.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PRIVATE_ADDRESS_SIZE] = fixed("private address", bytes)?;
        let (a_sk, sk_enc) = bytes.split_at(A_SK_SIZE);
        Self::from_slices(a_sk, sk_enc)
    }

    pub(crate) fn address_secret(&self) -> &[u8; A_SK_SIZE] {
        &self.a_sk
    }

    pub(crate) fn encryption_secret_key(&self) -> &EncryptionSecretKey {
        &self.sk_enc
    }
}

impl fmt::Debug for PrivateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateAddress(..)")
    }
}

/// Public half of an address
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SchemaRead, SchemaWrite,
)]
pub struct PublicAddress {
    a_pk: [u8; A_PK_SIZE],
    pk_enc: EncryptionPublicKey,
}

impl PublicAddress {
    /// Derive with the default [`Sha256AddressPrf`]
    pub fn derive(private: &PrivateAddress) -> Self {
        Self::derive_with(private, &Sha256AddressPrf)
    }

    pub fn derive_with<P: AddressPrf + ?Sized>(private: &PrivateAddress, prf: &P) -> Self {
        Self {
            a_pk: prf.derive(&private.a_sk),
            pk_enc: private.sk_enc.public_key(),
        }
    }

    /// Build from published values (e.g. a recipient's address string)
    pub fn from_parts(a_pk: [u8; A_PK_SIZE], pk_enc: EncryptionPublicKey) -> Self {
        Self { a_pk, pk_enc }
    }

    pub fn address_public(&self) -> &[u8; A_PK_SIZE] {
        &self.a_pk
    }

    pub fn encryption_public_key(&self) -> &EncryptionPublicKey {
        &self.pk_enc
    }

    /// Fixed layout: `a_pk || pk_enc`
    pub fn to_bytes(&self) -> [u8; PUBLIC_ADDRESS_SIZE] {
        let mut out = [0u8; PUBLIC_ADDRESS_SIZE];
        out[..A_PK_SIZE].copy_from_slice(&self.a_pk);
        out[A_PK_SIZE..].copy_from_slice(self.pk_enc.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PUBLIC_ADDRESS_SIZE] = fixed("public address", bytes)?;
        let (a_pk, pk_enc) = bytes.split_at(A_PK_SIZE);
        Ok(Self {
            a_pk: fixed("a_pk", a_pk)?,
            pk_enc: EncryptionPublicKey(fixed("pk_enc", pk_enc)?),
        })
    }
}

/// A full address: the private half and its derived public half.
///
/// Decoding needs the PRF the address was derived with, so there is no
/// `Deserialize`; use [`Address::from_bytes_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaWrite)]
pub struct Address {
    addr_pk: PublicAddress,
    addr_sk: PrivateAddress,
}

/// Unchecked decode target, same layout as [`Address`]
#[derive(SchemaRead)]
struct StoredAddress {
    addr_pk: PublicAddress,
    addr_sk: PrivateAddress,
}

impl Address {
    /// Generate a new address from the thread-local CSPRNG
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let addr_sk = PrivateAddress::random(rng)?;
        let address = Self::from_private(addr_sk);
        log::debug!("generated address");
        Ok(address)
    }

    /// Re-derive the public half of an existing private address
    pub fn from_private(addr_sk: PrivateAddress) -> Self {
        Self::from_private_with(addr_sk, &Sha256AddressPrf)
    }

    pub fn from_private_with<P: AddressPrf + ?Sized>(addr_sk: PrivateAddress, prf: &P) -> Self {
        let addr_pk = PublicAddress::derive_with(&addr_sk, prf);
        Self { addr_pk, addr_sk }
    }

    pub fn public_address(&self) -> &PublicAddress {
        &self.addr_pk
    }

    pub fn private_address(&self) -> &PrivateAddress {
        &self.addr_sk
    }

    pub(crate) fn address_secret(&self) -> &[u8; A_SK_SIZE] {
        self.addr_sk.address_secret()
    }

    pub(crate) fn encryption_secret_key(&self) -> &EncryptionSecretKey {
        self.addr_sk.encryption_secret_key()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wincode::serialize(self).map_err(|_| PrivacyError::Serialization)
    }

    /// Decode an address derived with the default PRF
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &Sha256AddressPrf)
    }

    /// Decode and re-derive the public half with `prf`.
    ///
    /// Stored public halves that do not match their private half, and input
    /// with trailing bytes, are rejected.
    pub fn from_bytes_with<P: AddressPrf + ?Sized>(bytes: &[u8], prf: &P) -> Result<Self> {
        let stored: StoredAddress =
            wincode::deserialize(bytes).map_err(|_| PrivacyError::Serialization)?;
        let address = Self::from_private_with(stored.addr_sk, prf);
        if address.addr_pk != stored.addr_pk {
            return Err(PrivacyError::Serialization);
        }
        if address.to_bytes()?.len() != bytes.len() {
            return Err(PrivacyError::Serialization);
        }
        Ok(address)
    }
}
