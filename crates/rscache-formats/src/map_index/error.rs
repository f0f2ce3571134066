//! Error types for map index decoding and building

use crate::archive::ArchiveError;
use thiserror::Error;

/// Errors that can occur when loading or building a map index
#[derive(Error, Debug)]
pub enum MapIndexError {
    /// The `map_index` entry could not be fetched
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A record could not be read or written
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for map index operations
pub type Result<T> = std::result::Result<T, MapIndexError>;
