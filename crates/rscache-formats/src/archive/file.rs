//! In-memory archive of named entries
//!
//! Entries are keyed by the legacy name hash, so lookups are
//! case-insensitive and names themselves are not stored. Entry data is held
//! already decompressed.

use crate::archive::error::{ArchiveError, ArchiveResult};
use bytes::{Bytes, BytesMut};
use rscache_crypto::{XteaCipher, XteaKey, xtea::BLOCK_SIZE};
use std::collections::BTreeMap;
use tracing::debug;

/// Lookup of named entries
///
/// Decoders take this trait rather than [`Archive`] so callers can serve
/// entries from whatever container they load.
pub trait ArchiveEntries {
    /// Get the data of the named entry
    fn entry(&self, name: &str) -> ArchiveResult<Bytes>;
}

/// Hash an entry name the way the legacy client does
///
/// `hash = hash * 61 + upper(c) - 32` over the bytes of the name, with
/// wrapping 32-bit signed arithmetic.
pub fn entry_name_hash(name: &str) -> i32 {
    name.bytes().fold(0i32, |hash, c| {
        hash.wrapping_mul(61)
            .wrapping_add(i32::from(c.to_ascii_uppercase()))
            .wrapping_sub(32)
    })
}

/// Named entries held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<i32, Bytes>,
}

impl Archive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named entry
    pub fn insert(&mut self, name: &str, data: impl Into<Bytes>) -> Option<Bytes> {
        self.insert_hashed(entry_name_hash(name), data)
    }

    /// Add or replace an entry by its name hash
    pub fn insert_hashed(&mut self, hash: i32, data: impl Into<Bytes>) -> Option<Bytes> {
        self.entries.insert(hash, data.into())
    }

    /// Get an entry by its name hash
    pub fn entry_by_hash(&self, hash: i32) -> Option<Bytes> {
        self.entries.get(&hash).cloned()
    }

    /// Remove a named entry
    pub fn remove(&mut self, name: &str) -> Option<Bytes> {
        self.entries.remove(&entry_name_hash(name))
    }

    /// Whether the named entry exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&entry_name_hash(name))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name hashes of every entry, ascending
    pub fn hashes(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.keys().copied()
    }

    /// Get a named entry with its whole 8-byte blocks deciphered
    ///
    /// Bytes past the last whole block are returned unchanged.
    pub fn decrypted_entry(&self, name: &str, key: &XteaKey) -> ArchiveResult<Bytes> {
        let data = self.entry(name)?;
        let length = data.len() - data.len() % BLOCK_SIZE;
        debug!(entry = name, length, "deciphering archive entry");

        let mut buf = BytesMut::from(data.as_ref());
        XteaCipher::new(key).decipher(&mut buf, 0, length)?;
        Ok(buf.freeze())
    }
}

impl ArchiveEntries for Archive {
    fn entry(&self, name: &str) -> ArchiveResult<Bytes> {
        self.entry_by_hash(entry_name_hash(name))
            .ok_or_else(|| ArchiveError::EntryNotFound(name.to_string()))
    }
}
