//! Error types for config definition decoding and encoding

use crate::archive::ArchiveError;
use thiserror::Error;

/// Errors that can occur when decoding or encoding config definitions
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Opcode has no property in the definition's defaults
    #[error("Unknown {definition} property: opcode {opcode}")]
    UnknownProperty {
        /// Opcode read from the record
        opcode: u8,
        /// Entry name of the definition being decoded
        definition: &'static str,
    },

    /// Buffer ran out before the value or terminator could be read
    #[error("Truncated record: needed {needed} bytes, {remaining} remaining")]
    TruncatedRecord {
        /// Bytes required by the read
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Property has neither a value nor a usable default to encode
    #[error("Property {name} (opcode {opcode}) has no value to encode")]
    MissingValue {
        /// Property opcode
        opcode: u8,
        /// Property name
        name: String,
    },

    /// List has more entries than its count prefix can hold
    #[error("List of {length} entries exceeds the encodable maximum of {max}")]
    ListTooLong {
        /// Entries in the list
        length: usize,
        /// Largest encodable length
        max: usize,
    },

    /// Definition count does not fit the entry header
    #[error("Too many definitions for one entry: {0}")]
    TooManyDefinitions(usize),

    /// Encoded definition does not fit its index slot
    #[error("Definition {id} encodes to {size} bytes, exceeding the index limit")]
    DefinitionTooLarge {
        /// Definition id
        id: u16,
        /// Encoded size in bytes
        size: usize,
    },

    /// Archive entry lookup failed
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl ConfigError {
    /// Check if this error was caused by malformed record bytes
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownProperty { .. } | Self::TruncatedRecord { .. }
        )
    }
}

/// Type alias for config operation results
pub type Result<T> = std::result::Result<T, ConfigError>;
