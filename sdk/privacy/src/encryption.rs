//! Note Encryption
//!
//! Carries a coin's secrets to its owner using ECDH + ChaCha20-Poly1305.
//!
//! ```text
//! Flow:
//! 1. Sender samples an ephemeral secret esk, epk = X25519(esk)
//! 2. Shared secret = ECDH(esk, pk_enc)
//! 3. Encryption key = HKDF-SHA256(salt = epk || pk_enc, "zerocash-note-v1")
//! 4. Ciphertext = ChaCha20-Poly1305(key, nonce, plaintext)
//! 5. Output = (epk, nonce, ciphertext || tag)
//! ```
//!
//! The scheme does not know what it carries; coins put `value || r || rho`
//! in the plaintext.

use core::fmt;

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use wincode::{SchemaRead, SchemaWrite};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::constants::ENC_KEY_SIZE;
use crate::error::{PrivacyError, Result};
use crate::util::concatenate;

const NOTE_KDF_INFO: &[u8] = b"zerocash-note-v1";

/// X25519 secret key used to open notes sent to an address
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
pub struct EncryptionSecretKey([u8; ENC_KEY_SIZE]);

impl EncryptionSecretKey {
    /// Restore from raw bytes
    pub fn from_bytes(bytes: [u8; ENC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; ENC_KEY_SIZE] {
        &self.0
    }

    /// The matching public key
    pub fn public_key(&self) -> EncryptionPublicKey {
        let secret = StaticSecret::from(self.0);
        EncryptionPublicKey(PublicKey::from(&secret).to_bytes())
    }
}

impl fmt::Debug for EncryptionSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionSecretKey(..)")
    }
}

/// X25519 public key that senders encrypt notes to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SchemaRead, SchemaWrite,
)]
pub struct EncryptionPublicKey(pub [u8; ENC_KEY_SIZE]);

impl EncryptionPublicKey {
    pub fn as_bytes(&self) -> &[u8; ENC_KEY_SIZE] {
        &self.0
    }
}

/// An encrypted note (published alongside its commitment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
pub struct EncryptedNote {
    /// Ephemeral public key for ECDH
    pub ephemeral_pk: [u8; 32],
    /// Nonce for ChaCha20-Poly1305
    pub nonce: [u8; 12],
    /// Encrypted payload with authentication tag
    pub ciphertext: Vec<u8>,
}

impl EncryptedNote {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        wincode::serialize(self).map_err(|_| PrivacyError::Serialization)
    }

    /// Decode a note; input with trailing bytes is rejected
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let note: Self = wincode::deserialize(bytes).map_err(|_| PrivacyError::Serialization)?;
        if note.to_bytes()?.len() != bytes.len() {
            return Err(PrivacyError::Serialization);
        }
        Ok(note)
    }
}

/// Generate an encryption key pair.
pub fn keygen<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<(EncryptionSecretKey, EncryptionPublicKey)> {
    let mut bytes = [0u8; ENC_KEY_SIZE];
    rng.try_fill_bytes(&mut bytes)?;

    let sk = EncryptionSecretKey(bytes);
    let pk = sk.public_key();
    Ok((sk, pk))
}

/// Encrypt `plaintext` to `recipient`.
pub fn encrypt<R: RngCore + CryptoRng>(
    recipient: &EncryptionPublicKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<EncryptedNote> {
    let mut esk = [0u8; ENC_KEY_SIZE];
    rng.try_fill_bytes(&mut esk)?;
    let ephemeral_secret = StaticSecret::from(esk);
    let ephemeral_pk = PublicKey::from(&ephemeral_secret);

    // ECDH shared secret; a low-order recipient key would make it predictable
    let shared_secret = ephemeral_secret.diffie_hellman(&PublicKey::from(recipient.0));
    if !shared_secret.was_contributory() {
        return Err(PrivacyError::EncryptionFailed);
    }

    let key = derive_note_key(shared_secret.as_bytes(), ephemeral_pk.as_bytes(), &recipient.0)
        .ok_or(PrivacyError::EncryptionFailed)?;

    let mut nonce = [0u8; 12];
    rng.try_fill_bytes(&mut nonce)?;

    let cipher = ChaCha20Poly1305::new(&key.into());
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| PrivacyError::EncryptionFailed)?;

    Ok(EncryptedNote {
        ephemeral_pk: *ephemeral_pk.as_bytes(),
        nonce,
        ciphertext,
    })
}

/// Decrypt a note with the recipient's secret key.
///
/// Any failure (wrong key, tampered ciphertext, bad tag) is reported as
/// [`PrivacyError::DecryptionFailed`].
pub fn decrypt(recipient_sk: &EncryptionSecretKey, encrypted: &EncryptedNote) -> Result<Vec<u8>> {
    let secret = StaticSecret::from(*recipient_sk.as_bytes());
    let recipient_pk = PublicKey::from(&secret);

    let shared_secret = secret.diffie_hellman(&PublicKey::from(encrypted.ephemeral_pk));
    if !shared_secret.was_contributory() {
        return Err(PrivacyError::DecryptionFailed);
    }

    let key = derive_note_key(
        shared_secret.as_bytes(),
        &encrypted.ephemeral_pk,
        recipient_pk.as_bytes(),
    )
    .ok_or(PrivacyError::DecryptionFailed)?;

    let cipher = ChaCha20Poly1305::new(&key.into());
    cipher
        .decrypt(
            Nonce::from_slice(&encrypted.nonce),
            encrypted.ciphertext.as_slice(),
        )
        .map_err(|_| PrivacyError::DecryptionFailed)
}

/// Derive the AEAD key, binding both public keys into the salt
fn derive_note_key(
    shared_secret: &[u8],
    ephemeral_pk: &[u8],
    recipient_pk: &[u8],
) -> Option<[u8; 32]> {
    let salt = concatenate(ephemeral_pk, recipient_pk);
    let hk = Hkdf::<Sha256>::new(Some(&salt), shared_secret);

    let mut key = [0u8; 32];
    hk.expand(NOTE_KDF_INFO, &mut key).ok()?;
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_encrypt_decrypt() {
        let (sk, pk) = keygen(&mut OsRng).unwrap();

        let plaintext = [42u8; 88];
        let encrypted = encrypt(&pk, &plaintext, &mut OsRng).unwrap();

        assert_eq!(encrypted.ciphertext.len(), plaintext.len() + 16);
        assert_eq!(decrypt(&sk, &encrypted).unwrap(), plaintext.to_vec());
    }

    #[test]
    fn test_wrong_key_fails() {
        let (_, pk) = keygen(&mut OsRng).unwrap();
        let (wrong_sk, _) = keygen(&mut OsRng).unwrap();

        let encrypted = encrypt(&pk, b"payload", &mut OsRng).unwrap();

        let result = decrypt(&wrong_sk, &encrypted);
        assert!(matches!(result, Err(PrivacyError::DecryptionFailed)));
    }

    #[test]
    fn test_tampering_fails() {
        let (sk, pk) = keygen(&mut OsRng).unwrap();
        let encrypted = encrypt(&pk, b"payload", &mut OsRng).unwrap();

        let mut flipped = encrypted.clone();
        flipped.ciphertext[0] ^= 0x01;
        assert!(decrypt(&sk, &flipped).is_err());

        let mut nonce = encrypted.clone();
        nonce.nonce[0] ^= 0x01;
        assert!(decrypt(&sk, &nonce).is_err());

        let mut truncated = encrypted;
        truncated.ciphertext.truncate(4);
        assert!(decrypt(&sk, &truncated).is_err());
    }

    #[test]
    fn test_low_order_keys_rejected() {
        let (sk, _) = keygen(&mut OsRng).unwrap();

        let identity = EncryptionPublicKey([0u8; 32]);
        assert!(matches!(
            encrypt(&identity, b"payload", &mut OsRng),
            Err(PrivacyError::EncryptionFailed)
        ));

        let forged = EncryptedNote {
            ephemeral_pk: [0u8; 32],
            nonce: [0u8; 12],
            ciphertext: vec![0u8; 32],
        };
        assert!(matches!(
            decrypt(&sk, &forged),
            Err(PrivacyError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_secret_key_restores_public_key() {
        let (sk, pk) = keygen(&mut OsRng).unwrap();
        let restored = EncryptionSecretKey::from_bytes(*sk.as_bytes());

        assert_eq!(restored.public_key(), pk);
        assert_eq!(format!("{restored:?}"), "EncryptionSecretKey(..)");
    }

    #[test]
    fn test_encrypted_note_wire_format() {
        let (sk, pk) = keygen(&mut OsRng).unwrap();
        let encrypted = encrypt(&pk, &[7u8; 88], &mut OsRng).unwrap();

        let bytes = encrypted.to_bytes().unwrap();
        let decoded = EncryptedNote::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, encrypted);
        assert_eq!(decrypt(&sk, &decoded).unwrap(), vec![7u8; 88]);
        assert!(EncryptedNote::from_bytes(&bytes[..10]).is_err());

        let mut padded = bytes;
        padded.push(0x00);
        assert!(matches!(
            EncryptedNote::from_bytes(&padded),
            Err(PrivacyError::Serialization)
        ));
    }
}
