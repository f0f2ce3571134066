//! XTEA block cipher used to protect legacy cache payloads
//!
//! The cache applies XTEA over a byte range in place, eight bytes at a time:
//! - Each block is read as two big-endian `u32` words
//! - 32 Feistel rounds with the golden-ratio delta `0x9E3779B9`
//! - The resulting words are written back big-endian into the same slot
//!
//! Only whole blocks are transformed. A trailing partial block inside the
//! requested range is left untouched, matching the legacy client.
//!
//! ## Usage
//!
//! ```rust
//! use rscache_crypto::xtea::{decipher, encipher};
//! use rscache_crypto::XteaKey;
//!
//! let key = XteaKey::new([1, 2, 3, 4]);
//! let mut data = *b"ABCDEFGHIJKLMNOP";
//!
//! encipher(&mut data, 0, 16, &key).expect("range is in bounds");
//! assert_ne!(&data, b"ABCDEFGHIJKLMNOP");
//!
//! decipher(&mut data, 0, 16, &key).expect("range is in bounds");
//! assert_eq!(&data, b"ABCDEFGHIJKLMNOP");
//! ```

use crate::error::{CryptoError, Result};
use crate::keys::XteaKey;

/// Golden-ratio derived round constant
pub const DELTA: u32 = 0x9E37_79B9;

/// Number of Feistel rounds
pub const ROUNDS: u32 = 32;

/// Size of one cipher block in bytes
pub const BLOCK_SIZE: usize = 8;

/// Initial sum for deciphering (`DELTA * ROUNDS`, wrapping)
const DECIPHER_SUM: u32 = DELTA.wrapping_mul(ROUNDS);

/// XTEA cipher bound to a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XteaCipher {
    key: [u32; 4],
}

impl XteaCipher {
    /// Create a cipher for the given key
    pub fn new(key: &XteaKey) -> Self {
        Self { key: *key.words() }
    }

    /// Encipher a pair of words
    pub fn encipher_words(&self, mut v0: u32, mut v1: u32) -> (u32, u32) {
        let key = &self.key;
        let mut sum = 0u32;

        for _ in 0..ROUNDS {
            v0 = v0.wrapping_add(
                (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1))
                    ^ sum.wrapping_add(key[(sum & 3) as usize]),
            );
            sum = sum.wrapping_add(DELTA);
            v1 = v1.wrapping_add(
                (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                    ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
            );
        }

        (v0, v1)
    }

    /// Decipher a pair of words
    pub fn decipher_words(&self, mut v0: u32, mut v1: u32) -> (u32, u32) {
        let key = &self.key;
        let mut sum = DECIPHER_SUM;

        for _ in 0..ROUNDS {
            v1 = v1.wrapping_sub(
                (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                    ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
            );
            sum = sum.wrapping_sub(DELTA);
            v0 = v0.wrapping_sub(
                (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1))
                    ^ sum.wrapping_add(key[(sum & 3) as usize]),
            );
        }

        (v0, v1)
    }

    /// Encipher every whole block in `data[offset..offset + length]` in place
    pub fn encipher(&self, data: &mut [u8], offset: usize, length: usize) -> Result<()> {
        let range = block_range(data, offset, length)?;
        for block in range.chunks_exact_mut(BLOCK_SIZE) {
            let (v0, v1) = read_block(block);
            let (v0, v1) = self.encipher_words(v0, v1);
            write_block(block, v0, v1);
        }
        Ok(())
    }

    /// Decipher every whole block in `data[offset..offset + length]` in place
    pub fn decipher(&self, data: &mut [u8], offset: usize, length: usize) -> Result<()> {
        let range = block_range(data, offset, length)?;
        for block in range.chunks_exact_mut(BLOCK_SIZE) {
            let (v0, v1) = read_block(block);
            let (v0, v1) = self.decipher_words(v0, v1);
            write_block(block, v0, v1);
        }
        Ok(())
    }
}

/// Encipher `data[offset..offset + length]` in place with `key`
pub fn encipher(data: &mut [u8], offset: usize, length: usize, key: &XteaKey) -> Result<()> {
    XteaCipher::new(key).encipher(data, offset, length)
}

/// Decipher `data[offset..offset + length]` in place with `key`
pub fn decipher(data: &mut [u8], offset: usize, length: usize, key: &XteaKey) -> Result<()> {
    XteaCipher::new(key).decipher(data, offset, length)
}

fn block_range(data: &mut [u8], offset: usize, length: usize) -> Result<&mut [u8]> {
    let available = data.len();
    let end = offset
        .checked_add(length)
        .filter(|&end| end <= available)
        .ok_or(CryptoError::InvalidBlockRange {
            offset,
            length,
            available,
        })?;

    Ok(&mut data[offset..end])
}

fn read_block(block: &[u8]) -> (u32, u32) {
    let v0 = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
    let v1 = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
    (v0, v1)
}

fn write_block(block: &mut [u8], v0: u32, v1: u32) {
    block[..4].copy_from_slice(&v0.to_be_bytes());
    block[4..].copy_from_slice(&v1.to_be_bytes());
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// (key, plaintext, ciphertext)
    const VECTORS: &[(&str, &str, &str)] = &[
        (
            "000102030405060708090a0b0c0d0e0f",
            "4142434445464748",
            "497df3d072612cb5",
        ),
        (
            "000102030405060708090a0b0c0d0e0f",
            "4141414141414141",
            "e78f2d13744341d8",
        ),
        (
            "000102030405060708090a0b0c0d0e0f",
            "5a5b6e278948d77f",
            "4141414141414141",
        ),
        (
            "00000000000000000000000000000000",
            "4142434445464748",
            "a0390589f8b8efa5",
        ),
        (
            "00000000000000000000000000000000",
            "4141414141414141",
            "ed23375a821a8c2d",
        ),
        (
            "00000000000000000000000000000000",
            "70e1225d6e4e7655",
            "4141414141414141",
        ),
    ];

    fn vector(key: &str, plaintext: &str, ciphertext: &str) -> (XteaKey, Vec<u8>, Vec<u8>) {
        (
            XteaKey::from_hex(key).expect("test key should be valid hex"),
            hex::decode(plaintext).expect("test plaintext should be valid hex"),
            hex::decode(ciphertext).expect("test ciphertext should be valid hex"),
        )
    }

    #[test]
    fn test_encipher_vectors() {
        for (key, plaintext, ciphertext) in VECTORS {
            let (key, mut data, expected) = vector(key, plaintext, ciphertext);
            encipher(&mut data, 0, 8, &key).expect("Operation should succeed");
            assert_eq!(hex::encode(&data), hex::encode(&expected));
        }
    }

    #[test]
    fn test_decipher_vectors() {
        for (key, plaintext, ciphertext) in VECTORS {
            let (key, expected, mut data) = vector(key, plaintext, ciphertext);
            decipher(&mut data, 0, 8, &key).expect("Operation should succeed");
            assert_eq!(hex::encode(&data), hex::encode(&expected));
        }
    }

    #[test]
    fn test_range_with_offset_leaves_surroundings() {
        let key = XteaKey::new([0xDEAD_BEEF, 1, 2, 3]);
        let mut data = vec![0xAAu8; 4 + 16 + 4];

        encipher(&mut data, 4, 16, &key).expect("Operation should succeed");
        assert_eq!(&data[..4], &[0xAA; 4]);
        assert_eq!(&data[20..], &[0xAA; 4]);
        assert_ne!(&data[4..20], &[0xAA; 16]);

        decipher(&mut data, 4, 16, &key).expect("Operation should succeed");
        assert_eq!(data, vec![0xAAu8; 24]);
    }

    #[test]
    fn test_blocks_are_independent() {
        let key = XteaKey::new([7, 7, 7, 7]);
        let mut two = *b"ABCDEFGHABCDEFGH";
        encipher(&mut two, 0, 16, &key).expect("Operation should succeed");
        assert_eq!(two[..8], two[8..]);
    }

    #[test]
    fn test_partial_block_untouched() {
        let key = XteaKey::new([1, 2, 3, 4]);
        let mut data = *b"ABCDEFGHxyz";
        encipher(&mut data, 0, 11, &key).expect("Operation should succeed");
        assert_eq!(&data[8..], b"xyz");

        decipher(&mut data, 0, 11, &key).expect("Operation should succeed");
        assert_eq!(&data, b"ABCDEFGHxyz");
    }

    #[test]
    fn test_zero_length_is_noop() {
        let key = XteaKey::new([1, 2, 3, 4]);
        let mut data = *b"12345678";
        encipher(&mut data, 8, 0, &key).expect("Operation should succeed");
        assert_eq!(&data, b"12345678");
    }

    #[test]
    fn test_range_out_of_bounds() {
        let key = XteaKey::new([1, 2, 3, 4]);
        let mut data = [0u8; 8];

        assert_eq!(
            encipher(&mut data, 8, 8, &key),
            Err(CryptoError::InvalidBlockRange {
                offset: 8,
                length: 8,
                available: 8,
            })
        );
        assert!(decipher(&mut data, usize::MAX, 8, &key).is_err());
    }

    #[test]
    fn test_word_round_trip() {
        let cipher = XteaCipher::new(&XteaKey::new([0x0102_0304, 0, u32::MAX, 42]));
        let (v0, v1) = cipher.encipher_words(0x4142_4344, 0x4546_4748);
        assert_eq!(cipher.decipher_words(v0, v1), (0x4142_4344, 0x4546_4748));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use proptest::test_runner::TestCaseError;

        proptest! {
            #[test]
            fn decipher_inverts_encipher(
                words in prop::array::uniform4(any::<u32>()),
                blocks in prop::collection::vec(prop::array::uniform8(any::<u8>()), 0..16),
            ) {
                let key = XteaKey::new(words);
                let original: Vec<u8> = blocks.concat();
                let mut data = original.clone();
                let length = data.len();

                encipher(&mut data, 0, length, &key).map_err(|e| TestCaseError::fail(e.to_string()))?;
                decipher(&mut data, 0, length, &key).map_err(|e| TestCaseError::fail(e.to_string()))?;

                prop_assert_eq!(data, original);
            }
        }
    }
}
