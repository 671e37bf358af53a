//! Hashing and bit/byte conversion helpers
//!
//! Every commitment in this crate is assembled from these functions, and the
//! spend circuit recomputes them bit for bit:
//!
//! ```text
//! bits:     MSB first within each byte   0x12 -> 0 0 0 1 0 0 1 0
//! integers: big-endian                   1u64 -> 00 00 00 00 00 00 00 01
//! hash:     SHA-256, 32-byte digest
//! ```

use sha2::{Digest, Sha256};

/// Size of a SHA-256 digest
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 of `data`
pub fn hash(data: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(data).into()
}

/// Finish hashing `data` on top of an existing hasher state.
///
/// A fresh `Sha256::new()` gives the same digest as [`hash`].
pub fn hash_with(mut hasher: Sha256, data: &[u8]) -> [u8; DIGEST_SIZE] {
    hasher.update(data);
    hasher.finalize().into()
}

/// `hash(a || b)` without materializing the concatenation
pub fn hash_pair(a: &[u8], b: &[u8]) -> [u8; DIGEST_SIZE] {
    hash_pair_with(Sha256::new(), a, b)
}

/// Streaming form of [`hash_pair`]
pub fn hash_pair_with(mut hasher: Sha256, a: &[u8], b: &[u8]) -> [u8; DIGEST_SIZE] {
    hasher.update(a);
    hasher.update(b);
    hasher.finalize().into()
}

/// Hash a bit sequence, returning the digest as bits.
///
/// The bits are packed with [`bits_to_bytes`] first, so callers should pass
/// whole bytes.
pub fn hash_bits(bits: &[bool]) -> Vec<bool> {
    bytes_to_bits(&hash(&bits_to_bytes(bits)))
}

/// `hash_bits(a || b)`
pub fn hash_bits_pair(a: &[bool], b: &[bool]) -> Vec<bool> {
    hash_bits(&concatenate(a, b))
}

/// Expand bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// Fill `bits` from the MSB-first expansion of `bytes`.
///
/// A target shorter than `8 * bytes.len()` keeps only the leading bits. Bits
/// past the end of `bytes` are set to `false`.
pub fn bytes_to_bits_into(bytes: &[u8], bits: &mut [bool]) {
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = bytes
            .get(i / 8)
            .is_some_and(|byte| (byte >> (7 - i % 8)) & 1 == 1);
    }
}

/// Pack bits into bytes, most significant bit first.
///
/// A trailing group of fewer than eight bits is packed right-aligned into
/// the last byte: seven `1` bits become `0x7f`, not `0xfe`.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8).map(pack_bits).collect()
}

/// Pack bits into a caller-sized buffer.
///
/// Bits that do not fit are dropped; bytes with no bits left are zeroed.
pub fn bits_to_bytes_into(bits: &[bool], bytes: &mut [u8]) {
    let mut chunks = bits.chunks(8);
    for byte in bytes.iter_mut() {
        *byte = chunks.next().map_or(0, pack_bits);
    }
}

fn pack_bits(chunk: &[bool]) -> u8 {
    chunk
        .iter()
        .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
}

/// Write `value` big-endian into `bytes`.
///
/// A buffer shorter than eight bytes keeps the low-order bytes. For longer
/// buffers the shift for position `i` (counted from the right) is
/// `8 * i mod 64`, so the low bytes repeat: 9 bytes of `0xf1f2f3f401020304`
/// are `04 f1 f2 f3 f4 01 02 03 04`.
pub fn int_to_bytes(value: u64, bytes: &mut [u8]) {
    for (i, byte) in bytes.iter_mut().rev().enumerate() {
        *byte = value.wrapping_shr((i * 8) as u32) as u8;
    }
}

/// Read a big-endian integer. Only the last eight bytes survive longer input.
pub fn bytes_to_int(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

pub fn concatenate<T: Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

pub fn concatenate3<T: Clone>(a: &[T], b: &[T], c: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len() + c.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out.extend_from_slice(c);
    out
}

/// True when every element is zero (or the slice is empty).
///
/// Reads the whole slice regardless of content.
pub fn is_all_zero<T: Copy + Into<u8>>(values: &[T]) -> bool {
    values.iter().fold(0u8, |acc, &v| acc | v.into()) == 0
}
