//! Decoders and encoders for legacy game cache formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format encoding
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Cache terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate reads and writes the formats stored in the archives of a legacy
//! game client cache.
//!
//! # Supported Formats
//!
//! - **Config definitions**: sparse opcode records decoded over a shared
//!   default template (identity kits, varbits, varps)
//! - **Map index**: fixed 7-byte records mapping regions to terrain and
//!   object files
//! - **Archive entries**: named entry lookup with the legacy name hash and
//!   XTEA-protected entries
//!
//! # Design Principles
//!
//! Every format implementation follows these principles:
//! - **Symmetric Operations**: Both decoding and encoding supported
//! - **Bounds-Checked Reads**: Truncated input is an error, never a panic
//! - **Canonical Output**: Re-encoding writes properties in ascending opcode
//!   order and omits anything left at its default

#![warn(missing_docs)]

/// Named archive entries and the legacy entry name hash
pub mod archive;
/// Config definitions built from typed, defaulted properties
pub mod config;
/// Map index format mapping regions to their map files
///
/// See the [`map_index`] module for the record layout.
pub mod map_index;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use rscache_crypto::{XteaKey, XteaKeyStore};

/// Common format trait for whole-entry formats
pub trait CacheFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
