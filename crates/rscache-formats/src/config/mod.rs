//! Config archive definitions
//!
//! Definitions (identity kits, varbits, varps, ...) are stored as sparse
//! records of `(opcode, payload)` pairs. Each definition type declares a
//! [`DefaultDefinition`] template giving every opcode its name, default value
//! and [`PropertyCodec`]; a record only carries the properties that differ
//! from the template.
//!
//! ```
//! use bytes::Bytes;
//! use rscache_formats::config::{ConfigDefinition, IdentityKitDefinition, Part};
//!
//! let mut record = Bytes::from_static(&[1, 0, 3, 0]);
//! let kit = IdentityKitDefinition::decode(0, &mut record)?;
//!
//! assert_eq!(kit.part(), Part::MaleHair);
//! assert!(kit.player_design_style());
//! assert_eq!(kit.head_model(1), Some(-1));
//! assert_eq!(kit.encode()?.as_ref(), &[1, 0, 3, 0]);
//! # Ok::<(), rscache_formats::config::ConfigError>(())
//! ```

pub mod buffer;
pub mod codec;
mod config_property;
mod definition;
mod error;
pub mod kit;
mod map;
mod property;
pub mod varbit;
pub mod varp;

pub use buffer::{BufExt, BufMutExt};
pub use codec::PropertyCodec;
pub use config_property::{ConfigProperty, SerializableProperty};
pub use definition::{
    ConfigDecoder, ConfigDefinition, ConfigEncoder, EncodedEntry, data_entry_name,
    index_entry_name,
};
pub use error::{ConfigError, Result};
pub use kit::{IdentityKitDefinition, Part};
pub use map::{DEFINITION_TERMINATOR, DefaultDefinition, PropertyMap};
pub use property::{ConfigPropertyType, Property, PropertyValue};
pub use varbit::{BitVariable, BitVariableDefinition, NamedBitVariableDefinition};
pub use varp::ParameterVariableDefinition;
