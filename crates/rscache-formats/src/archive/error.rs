//! Error types for archive operations

use rscache_crypto::CryptoError;
use thiserror::Error;

/// Archive operation result type
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Error types for archive operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Named entry is not in the archive
    #[error("Archive entry not found: {0}")]
    EntryNotFound(String),

    /// Entry could not be deciphered
    #[error("Entry decryption failed: {0}")]
    Crypto(#[from] CryptoError),
}

impl ArchiveError {
    /// Check if this error is permanent (no point in retrying the same archive)
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::EntryNotFound(_))
    }
}
