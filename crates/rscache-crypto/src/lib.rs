//! Cryptographic operations for legacy game cache payloads
//!
//! This crate provides the XTEA block cipher used by the cache to protect
//! selected archive entries, along with the key types needed to drive it.
//!
//! # Components
//!
//! - **Encryption**: XTEA over 8-byte blocks, in place over a byte range
//! - **Key Management**: 128-bit keys and a region-indexed key store
//!
//! # Examples
//!
//! ```
//! use rscache_crypto::{XteaCipher, XteaKey};
//!
//! let key = XteaKey::from_hex("000102030405060708090a0b0c0d0e0f").expect("valid key");
//! let cipher = XteaCipher::new(&key);
//!
//! let mut block = *b"ABCDEFGH";
//! cipher.encipher(&mut block, 0, 8).expect("range is in bounds");
//! assert_eq!(block, [0x49, 0x7d, 0xf3, 0xd0, 0x72, 0x61, 0x2c, 0xb5]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod xtea;

pub use error::CryptoError;

// Re-export commonly used types
pub use keys::{XteaKey, XteaKeyStore};
pub use xtea::XteaCipher;
