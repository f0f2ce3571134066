//! Error types for cryptographic operations

use thiserror::Error;

/// Errors that can occur during cryptographic operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid key size
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// Invalid key format
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Cipher range extends past the end of the buffer
    #[error("Invalid block range: offset {offset} + length {length} exceeds buffer of {available} bytes")]
    InvalidBlockRange {
        /// Start of the requested range
        offset: usize,
        /// Length of the requested range
        length: usize,
        /// Size of the buffer
        available: usize,
    },

    /// Key not found
    #[error("XTEA key not found for region {0}")]
    KeyNotFound(u16),
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
