//! Coins
//!
//! A Coin is one unspent note, bound to its owner's public address.
//!
//! ```text
//! Coin = {
//!     addr_pk:    PublicAddress,   // owner
//!     cm:         CoinCommitment,  // SHA256(coin_value || k)
//!     rho:        [u8; 32],        // serial-number seed
//!     r:          [u8; 48],        // commitment trapdoor
//!     k:          [u8; 32],        // SHA256(r || SHA256(a_pk || rho)[..16])
//!     coin_value: [u8; 8],         // u64, big-endian
//! }
//! ```
//!
//! Coins are either minted (fresh `rho`, `r`) or recovered from an
//! [`EncryptedNote`] whose plaintext is `coin_value || r || rho`. Both paths
//! end in the same derivation of `k` and `cm`.

use core::fmt;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use crate::address::{Address, PublicAddress};
use crate::commitment::CoinCommitment;
use crate::constants::{
    A_SK_SIZE, K_SIZE, K_TRUNC_SIZE, NOTE_PLAINTEXT_SIZE, R_SIZE, RHO_SIZE, V_SIZE,
};
use crate::encryption::{self, EncryptedNote};
use crate::error::{PrivacyError, Result, fixed};
use crate::util::{bytes_to_int, concatenate3, hash_pair, int_to_bytes};

/// A shielded coin
///
/// Every decode path (serde or [`Coin::from_bytes`]) runs [`Coin::verify`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, SchemaWrite)]
#[serde(try_from = "StoredCoin")]
pub struct Coin {
    addr_pk: PublicAddress,
    cm: CoinCommitment,
    rho: [u8; RHO_SIZE],
    #[serde(with = "serde_bytes")]
    r: [u8; R_SIZE],
    k: [u8; K_SIZE],
    coin_value: [u8; V_SIZE],
}

impl Coin {
    /// Mint a coin for `owner` with randomness from the thread-local CSPRNG
    pub fn mint(owner: &PublicAddress, value: u64) -> Result<Self> {
        Self::mint_with_rng(owner, value, &mut rand::thread_rng())
    }

    pub fn mint_with_rng<R: RngCore + CryptoRng>(
        owner: &PublicAddress,
        value: u64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut rho = [0u8; RHO_SIZE];
        rng.try_fill_bytes(&mut rho)?;

        let mut r = [0u8; R_SIZE];
        rng.try_fill_bytes(&mut r)?;

        let coin = Self::with_randomness(owner, value, rho, r);
        log::trace!("minted coin {}", short_hex(coin.cm.as_bytes()));
        Ok(coin)
    }

    /// Mint with caller-chosen `rho` and `r`.
    ///
    /// Identical inputs always give a byte-identical coin.
    pub fn with_randomness(
        owner: &PublicAddress,
        value: u64,
        rho: [u8; RHO_SIZE],
        r: [u8; R_SIZE],
    ) -> Self {
        let mut coin_value = [0u8; V_SIZE];
        int_to_bytes(value, &mut coin_value);
        Self::assemble(*owner, coin_value, rho, r)
    }

    /// Slice form of [`Coin::with_randomness`]; wrong lengths are rejected
    pub fn from_slices(owner: &PublicAddress, value: u64, rho: &[u8], r: &[u8]) -> Result<Self> {
        Ok(Self::with_randomness(
            owner,
            value,
            fixed("rho", rho)?,
            fixed("r", r)?,
        ))
    }

    /// Recover a coin sent to `owner`.
    ///
    /// Fails with [`PrivacyError::DecryptionFailed`] when the note was not
    /// encrypted to this address or was tampered with, and with
    /// [`PrivacyError::MalformedPlaintext`] when it decrypts to fewer than
    /// 88 bytes. Bytes past the first 88 are ignored.
    pub fn recover(encrypted: &EncryptedNote, owner: &Address) -> Result<Self> {
        let plaintext = encryption::decrypt(owner.encryption_secret_key(), encrypted)?;
        if plaintext.len() < NOTE_PLAINTEXT_SIZE {
            return Err(PrivacyError::MalformedPlaintext {
                len: plaintext.len(),
            });
        }

        let coin_value: [u8; V_SIZE] = fixed("value", &plaintext[..V_SIZE])?;
        let r: [u8; R_SIZE] = fixed("r", &plaintext[V_SIZE..V_SIZE + R_SIZE])?;
        let rho: [u8; RHO_SIZE] = fixed("rho", &plaintext[V_SIZE + R_SIZE..NOTE_PLAINTEXT_SIZE])?;

        Ok(Self::assemble(*owner.public_address(), coin_value, rho, r))
    }

    /// Scan mode: `Ok(None)` when the note is not for `owner`.
    ///
    /// Notes that do decrypt but carry a short plaintext are still errors.
    pub fn try_recover(encrypted: &EncryptedNote, owner: &Address) -> Result<Option<Self>> {
        match Self::recover(encrypted, owner) {
            Ok(coin) => Ok(Some(coin)),
            Err(PrivacyError::DecryptionFailed) => {
                log::trace!("note not addressed to this address");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Recover and check the result against a commitment already in the tree
    pub fn recover_matching(
        encrypted: &EncryptedNote,
        owner: &Address,
        expected: &CoinCommitment,
    ) -> Result<Self> {
        let coin = Self::recover(encrypted, owner)?;
        if coin.cm != *expected {
            log::debug!(
                "recovered coin {} does not match {}",
                short_hex(coin.cm.as_bytes()),
                short_hex(expected.as_bytes())
            );
            return Err(PrivacyError::CommitmentMismatch);
        }
        Ok(coin)
    }

    /// Encrypt `value || r || rho` to the owner's encryption key
    pub fn encrypt_for_owner<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<EncryptedNote> {
        encryption::encrypt(
            self.addr_pk.encryption_public_key(),
            &self.note_plaintext(),
            rng,
        )
    }

    fn note_plaintext(&self) -> [u8; NOTE_PLAINTEXT_SIZE] {
        let mut plaintext = [0u8; NOTE_PLAINTEXT_SIZE];
        let (value, rest) = plaintext.split_at_mut(V_SIZE);
        let (r, rho) = rest.split_at_mut(R_SIZE);
        value.copy_from_slice(&self.coin_value);
        r.copy_from_slice(&self.r);
        rho.copy_from_slice(&self.rho);
        plaintext
    }

    fn assemble(
        addr_pk: PublicAddress,
        coin_value: [u8; V_SIZE],
        rho: [u8; RHO_SIZE],
        r: [u8; R_SIZE],
    ) -> Self {
        let k = internal_commitment(addr_pk.address_public(), &rho, &r);
        let cm = CoinCommitment::new(&coin_value, &k);

        Self {
            addr_pk,
            cm,
            rho,
            r,
            k,
            coin_value,
        }
    }

    /// Recompute `k` and `cm` and compare with the stored values
    pub fn verify(&self) -> Result<()> {
        let expected = Self::assemble(self.addr_pk, self.coin_value, self.rho, self.r);
        if expected.k != self.k || expected.cm != self.cm {
            return Err(PrivacyError::InconsistentCoin);
        }
        Ok(())
    }

    /// Gather the spend witness. Only the owner's full address unlocks it.
    pub fn spend_witness(&self, owner: &Address) -> Result<SpendWitness> {
        if *owner.public_address() != self.addr_pk {
            return Err(PrivacyError::WrongOwner);
        }

        Ok(SpendWitness {
            a_sk: *owner.address_secret(),
            rho: self.rho,
            r: self.r,
            k: self.k,
            value: self.value(),
            cm: self.cm,
        })
    }

    pub fn value(&self) -> u64 {
        bytes_to_int(&self.coin_value)
    }

    pub fn public_address(&self) -> &PublicAddress {
        &self.addr_pk
    }

    pub fn commitment(&self) -> &CoinCommitment {
        &self.cm
    }

    /// Storage encoding (includes the secrets; not for the wire)
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wincode::serialize(self).map_err(|_| PrivacyError::Serialization)
    }

    /// Decode a stored coin and check its commitments.
    ///
    /// Input with bytes left over after the coin is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let stored: StoredCoin =
            wincode::deserialize(bytes).map_err(|_| PrivacyError::Serialization)?;
        let coin = Self::try_from(stored)?;
        if coin.to_bytes()?.len() != bytes.len() {
            return Err(PrivacyError::Serialization);
        }
        Ok(coin)
    }
}

/// Unchecked decode target, same layout as [`Coin`]
#[derive(Deserialize, SchemaRead)]
struct StoredCoin {
    addr_pk: PublicAddress,
    cm: CoinCommitment,
    rho: [u8; RHO_SIZE],
    #[serde(with = "serde_bytes")]
    r: [u8; R_SIZE],
    k: [u8; K_SIZE],
    coin_value: [u8; V_SIZE],
}

impl TryFrom<StoredCoin> for Coin {
    type Error = PrivacyError;

    fn try_from(stored: StoredCoin) -> Result<Self> {
        let coin = Self {
            addr_pk: stored.addr_pk,
            cm: stored.cm,
            rho: stored.rho,
            r: stored.r,
            k: stored.k,
            coin_value: stored.coin_value,
        };
        coin.verify()?;
        Ok(coin)
    }
}

impl fmt::Debug for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coin")
            .field("addr_pk", &self.addr_pk)
            .field("cm", &self.cm)
            .field("value", &self.value())
            .finish_non_exhaustive()
    }
}

/// `k = SHA256(r || SHA256(a_pk || rho)[..16])`
fn internal_commitment(
    a_pk: &[u8],
    rho: &[u8; RHO_SIZE],
    r: &[u8; R_SIZE],
) -> [u8; K_SIZE] {
    let inner = hash_pair(a_pk, rho);
    let mut truncated = [0u8; K_TRUNC_SIZE];
    truncated.copy_from_slice(&inner[..K_TRUNC_SIZE]);
    hash_pair(r, &truncated)
}

/// Secret inputs the spend circuit needs for one coin
#[derive(Clone, PartialEq, Eq)]
pub struct SpendWitness {
    a_sk: [u8; A_SK_SIZE],
    rho: [u8; RHO_SIZE],
    r: [u8; R_SIZE],
    k: [u8; K_SIZE],
    value: u64,
    cm: CoinCommitment,
}

impl SpendWitness {
    pub fn address_secret(&self) -> &[u8; A_SK_SIZE] {
        &self.a_sk
    }

    pub fn rho(&self) -> &[u8; RHO_SIZE] {
        &self.rho
    }

    pub fn trapdoor(&self) -> &[u8; R_SIZE] {
        &self.r
    }

    pub fn internal_commitment(&self) -> &[u8; K_SIZE] {
        &self.k
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn commitment(&self) -> &CoinCommitment {
        &self.cm
    }

    /// All witness bytes in circuit order: `a_sk || rho || r`
    pub fn secret_bytes(&self) -> Vec<u8> {
        concatenate3(&self.a_sk, &self.rho, &self.r)
    }
}

impl fmt::Debug for SpendWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpendWitness")
            .field("cm", &self.cm)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

fn short_hex(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{concatenate, hash};
    use rand::rngs::OsRng;

    #[test]
    fn test_mint_is_deterministic_with_fixed_randomness() {
        let owner = Address::generate().unwrap();
        let pk = owner.public_address();

        let c1 = Coin::with_randomness(pk, 1000, [1u8; 32], [2u8; 48]);
        let c2 = Coin::with_randomness(pk, 1000, [1u8; 32], [2u8; 48]);

        assert_eq!(c1, c2);
        assert_eq!(c1.to_bytes().unwrap(), c2.to_bytes().unwrap());
    }

    #[test]
    fn test_commitment_derivation() {
        let owner = Address::generate().unwrap();
        let pk = owner.public_address();
        let rho = [5u8; 32];
        let r = [6u8; 48];

        let coin = Coin::with_randomness(pk, 42, rho, r);

        // spelled out without the helpers
        let inner = hash(&concatenate(pk.address_public(), &rho));
        let k = hash(&concatenate(&r, &inner[..16]));
        let cm = hash(&concatenate(&42u64.to_be_bytes(), &k));

        assert_eq!(coin.k, k);
        assert_eq!(coin.commitment().as_bytes(), &cm);
        assert_eq!(
            *coin.commitment(),
            CoinCommitment::new(&42u64.to_be_bytes(), &k)
        );
    }

    #[test]
    fn test_value_encoding() {
        let owner = Address::generate().unwrap();

        for value in [0, 1, 0xdead_beef, u64::MAX] {
            let coin = Coin::mint(owner.public_address(), value).unwrap();
            assert_eq!(coin.value(), value);
            assert_eq!(coin.coin_value, value.to_be_bytes());
        }
    }

    #[test]
    fn test_fresh_mints_differ() {
        let owner = Address::generate().unwrap();

        let c1 = Coin::mint(owner.public_address(), 1000).unwrap();
        let c2 = Coin::mint(owner.public_address(), 1000).unwrap();

        assert_ne!(c1.commitment(), c2.commitment());
        assert_ne!(c1.rho, c2.rho);
    }

    #[test]
    fn test_from_slices_rejects_wrong_lengths() {
        let owner = Address::generate().unwrap();
        let pk = owner.public_address();

        assert!(Coin::from_slices(pk, 1, &[0u8; 32], &[0u8; 48]).is_ok());
        assert!(matches!(
            Coin::from_slices(pk, 1, &[0u8; 31], &[0u8; 48]),
            Err(PrivacyError::InvalidLength { field: "rho", .. })
        ));
        assert!(matches!(
            Coin::from_slices(pk, 1, &[0u8; 32], &[0u8; 32]),
            Err(PrivacyError::InvalidLength { field: "r", .. })
        ));
    }

    #[test]
    fn test_recover_roundtrip() {
        let owner = Address::generate().unwrap();
        let coin = Coin::with_randomness(owner.public_address(), 77, [9u8; 32], [8u8; 48]);

        let encrypted = coin.encrypt_for_owner(&mut OsRng).unwrap();
        let recovered = Coin::recover(&encrypted, &owner).unwrap();

        assert_eq!(recovered, coin);
    }

    #[test]
    fn test_recover_plaintext_layout() {
        let owner = Address::generate().unwrap();
        let rho = [0x11u8; 32];
        let r = [0x22u8; 48];

        let mut plaintext = 500u64.to_be_bytes().to_vec();
        plaintext.extend_from_slice(&r);
        plaintext.extend_from_slice(&rho);
        // trailing padding is ignored
        plaintext.extend_from_slice(&[0xffu8; 8]);

        let encrypted = encryption::encrypt(
            owner.public_address().encryption_public_key(),
            &plaintext,
            &mut OsRng,
        )
        .unwrap();

        let recovered = Coin::recover(&encrypted, &owner).unwrap();
        assert_eq!(
            recovered,
            Coin::with_randomness(owner.public_address(), 500, rho, r)
        );
    }

    #[test]
    fn test_recover_short_plaintext_fails() {
        let owner = Address::generate().unwrap();
        let encrypted = encryption::encrypt(
            owner.public_address().encryption_public_key(),
            &[0u8; 87],
            &mut OsRng,
        )
        .unwrap();

        assert!(matches!(
            Coin::recover(&encrypted, &owner),
            Err(PrivacyError::MalformedPlaintext { len: 87 })
        ));
        assert!(Coin::try_recover(&encrypted, &owner).is_err());
    }

    #[test]
    fn test_try_recover_other_address() {
        let alice = Address::generate().unwrap();
        let bob = Address::generate().unwrap();

        let coin = Coin::mint(alice.public_address(), 10).unwrap();
        let encrypted = coin.encrypt_for_owner(&mut OsRng).unwrap();

        assert!(Coin::try_recover(&encrypted, &bob).unwrap().is_none());
        assert_eq!(
            Coin::try_recover(&encrypted, &alice).unwrap(),
            Some(coin)
        );
    }

    #[test]
    fn test_recover_matching() {
        let owner = Address::generate().unwrap();
        let coin = Coin::mint(owner.public_address(), 10).unwrap();
        let other = Coin::mint(owner.public_address(), 10).unwrap();
        let encrypted = coin.encrypt_for_owner(&mut OsRng).unwrap();

        assert!(Coin::recover_matching(&encrypted, &owner, coin.commitment()).is_ok());
        assert!(matches!(
            Coin::recover_matching(&encrypted, &owner, other.commitment()),
            Err(PrivacyError::CommitmentMismatch)
        ));
    }

    #[test]
    fn test_spend_witness_requires_owner() {
        let owner = Address::generate().unwrap();
        let stranger = Address::generate().unwrap();
        let coin = Coin::with_randomness(owner.public_address(), 3, [1u8; 32], [2u8; 48]);

        let witness = coin.spend_witness(&owner).unwrap();
        assert_eq!(witness.address_secret(), owner.address_secret());
        assert_eq!(witness.rho(), &[1u8; 32]);
        assert_eq!(witness.trapdoor(), &[2u8; 48]);
        assert_eq!(witness.internal_commitment(), &coin.k);
        assert_eq!(witness.value(), 3);
        assert_eq!(witness.commitment(), coin.commitment());
        assert_eq!(witness.secret_bytes().len(), 32 + 32 + 48);

        assert!(matches!(
            coin.spend_witness(&stranger),
            Err(PrivacyError::WrongOwner)
        ));
    }

    #[test]
    fn test_storage_roundtrip_checks_commitments() {
        let owner = Address::generate().unwrap();
        let coin = Coin::mint(owner.public_address(), 99).unwrap();

        let bytes = coin.to_bytes().unwrap();
        assert_eq!(Coin::from_bytes(&bytes).unwrap(), coin);

        // flip the last byte of the encoded value
        let mut corrupted = bytes.clone();
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0x01;
        assert!(matches!(
            Coin::from_bytes(&corrupted),
            Err(PrivacyError::InconsistentCoin)
        ));
    }

    #[test]
    fn test_storage_rejects_trailing_bytes() {
        let owner = Address::generate().unwrap();
        let coin = Coin::mint(owner.public_address(), 98).unwrap();

        let mut padded = coin.to_bytes().unwrap();
        padded.push(0x00);
        assert!(matches!(
            Coin::from_bytes(&padded),
            Err(PrivacyError::Serialization)
        ));
    }

    #[test]
    fn test_serde_decode_checks_commitments() {
        let owner = Address::generate().unwrap();
        let coin = Coin::mint(owner.public_address(), 98).unwrap();

        let json = serde_json::to_value(&coin).unwrap();
        let decoded: Coin = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(decoded, coin);

        let mut corrupted = json;
        corrupted["coin_value"][7] = serde_json::json!(99);
        assert!(serde_json::from_value::<Coin>(corrupted).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let owner = Address::generate().unwrap();
        let coin = Coin::with_randomness(owner.public_address(), 5, [0xabu8; 32], [0xcdu8; 48]);

        let debug = format!("{coin:?}");
        assert!(debug.contains("value: 5"));
        assert!(!debug.contains("rho"));
    }
}
