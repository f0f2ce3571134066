//! XTEA key management
//!
//! Protected cache payloads are keyed per map region. A key is four 32-bit
//! words; on disk and in key dumps it is written as 16 big-endian bytes.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CryptoError, Result};

/// Size of an XTEA key in bytes
pub const KEY_SIZE: usize = 16;

/// A 128-bit XTEA key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XteaKey([u32; 4]);

impl XteaKey {
    /// Create a key from its four words
    pub const fn new(words: [u32; 4]) -> Self {
        Self(words)
    }

    /// The all-zero key
    pub const fn zero() -> Self {
        Self([0; 4])
    }

    /// Create a key from 16 big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeySize {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }

        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Self(words))
    }

    /// Parse key from a 32 digit hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex.trim())
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// The key words
    pub const fn words(&self) -> &[u32; 4] {
        &self.0
    }

    /// Key as 16 big-endian bytes
    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        let mut bytes = [0u8; KEY_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    /// Check if every word is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }
}

impl From<[u32; 4]> for XteaKey {
    fn from(words: [u32; 4]) -> Self {
        Self(words)
    }
}

impl fmt::Display for XteaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

/// Store for XTEA keys indexed by map region id
#[derive(Debug, Clone, Default)]
pub struct XteaKeyStore {
    keys: HashMap<u16, XteaKey>,
}

impl XteaKeyStore {
    /// Create an empty key store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the key for a region
    pub fn get(&self, region: u16) -> Option<&XteaKey> {
        self.keys.get(&region)
    }

    /// Get the key for a region, failing if it is unknown
    pub fn require(&self, region: u16) -> Result<&XteaKey> {
        self.get(region).ok_or(CryptoError::KeyNotFound(region))
    }

    /// Add a key, returning any key it replaced
    pub fn insert(&mut self, region: u16, key: XteaKey) -> Option<XteaKey> {
        self.keys.insert(region, key)
    }

    /// Remove the key for a region
    pub fn remove(&mut self, region: u16) -> Option<XteaKey> {
        self.keys.remove(&region)
    }

    /// Get the number of keys in the store
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Load keys from text content (format: `region,key_hex` per line)
    ///
    /// Lines starting with `#` are treated as comments. Malformed lines are
    /// skipped. Returns the number of keys loaded.
    ///
    /// # Example
    ///
    /// ```
    /// use rscache_crypto::XteaKeyStore;
    ///
    /// let content = r#"
    /// # region,key
    /// 12850,000102030405060708090a0b0c0d0e0f
    /// 12851, 00000000000000000000000000000000
    /// not a key line
    /// "#;
    ///
    /// let mut store = XteaKeyStore::new();
    /// assert_eq!(store.load_from_text(content), 2);
    /// ```
    pub fn load_from_text(&mut self, content: &str) -> usize {
        let mut count = 0;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((region, hex)) = line.split_once(',') else {
                continue;
            };

            let Ok(region) = region.trim().parse::<u16>() else {
                continue;
            };

            if let Ok(key) = XteaKey::from_hex(hex) {
                self.insert(region, key);
                count += 1;
            }
        }

        count
    }

    /// Iterate over all `(region, key)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (u16, &XteaKey)> {
        self.keys.iter().map(|(region, key)| (*region, key))
    }
}
