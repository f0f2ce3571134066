//! Archive entry lookup
//!
//! The cache groups files into archives of named entries. Decoders in this
//! crate never open an archive themselves; they ask an [`ArchiveEntries`]
//! implementation for an entry by name and get its bytes or
//! [`ArchiveError::EntryNotFound`].
//!
//! # Usage Examples
//!
//! ```rust
//! use rscache_formats::archive::{Archive, ArchiveEntries, ArchiveError};
//!
//! let mut archive = Archive::new();
//! archive.insert("map_index", vec![0u8; 7]);
//!
//! assert_eq!(archive.entry("MAP_INDEX")?.len(), 7);
//! assert!(matches!(archive.entry("idk.dat"), Err(ArchiveError::EntryNotFound(_))));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;

pub use error::{ArchiveError, ArchiveResult};
pub use file::{Archive, ArchiveEntries, entry_name_hash};
