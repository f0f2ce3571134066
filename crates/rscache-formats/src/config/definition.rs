//! Typed definitions and whole-entry decoding
//!
//! A config entry `<name>.dat` stores a big-endian `u16` definition count
//! followed by that many terminator-ended records. Definition ids are the
//! record positions. The companion `<name>.idx` stores the same count and
//! then the encoded length of each record as a `u16`.

use crate::archive::{Archive, ArchiveEntries};
use crate::config::buffer::BufExt;
use crate::config::error::{ConfigError, Result};
use crate::config::map::{DefaultDefinition, PropertyMap};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

/// A definition type backed by a [`PropertyMap`]
pub trait ConfigDefinition: Sized {
    /// Entry name without extension, e.g. `idk`
    const ENTRY_NAME: &'static str;

    /// Shared template for this definition type
    fn defaults() -> &'static DefaultDefinition;

    /// Wrap decoded properties
    fn from_properties(id: u16, properties: PropertyMap) -> Self;

    /// Definition id
    fn id(&self) -> u16;

    /// The definition's properties
    fn properties(&self) -> &PropertyMap;

    /// Mutable access to the definition's properties
    fn properties_mut(&mut self) -> &mut PropertyMap;

    /// Create a definition holding only defaults
    fn with_defaults(id: u16) -> Self {
        Self::from_properties(id, Self::defaults().to_property_map())
    }

    /// Decode one record
    fn decode(id: u16, buf: &mut Bytes) -> Result<Self> {
        Ok(Self::from_properties(id, Self::defaults().decode(buf)?))
    }

    /// Encode one record
    fn encode(&self) -> Result<Bytes> {
        self.properties().encode()
    }
}

/// Name of the data entry for a definition type
pub fn data_entry_name<D: ConfigDefinition>() -> String {
    format!("{}.dat", D::ENTRY_NAME)
}

/// Name of the index entry for a definition type
pub fn index_entry_name<D: ConfigDefinition>() -> String {
    format!("{}.idx", D::ENTRY_NAME)
}

/// Decodes every definition of one type from a config archive
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigDecoder;

impl ConfigDecoder {
    /// Decode all definitions from the `<name>.dat` entry of `archive`
    pub fn decode<D: ConfigDefinition>(archive: &impl ArchiveEntries) -> Result<Vec<D>> {
        let name = data_entry_name::<D>();
        let data = archive.entry(&name)?;
        let definitions = Self::decode_data::<D>(data)?;
        debug!(entry = %name, count = definitions.len(), "decoded config entry");
        Ok(definitions)
    }

    /// Decode all definitions from raw `.dat` bytes
    pub fn decode_data<D: ConfigDefinition>(mut data: Bytes) -> Result<Vec<D>> {
        let count = data.read_u16()?;
        (0..count).map(|id| D::decode(id, &mut data)).collect()
    }
}

/// Encoded `.dat` and `.idx` entry bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEntry {
    /// Definition count followed by every record
    pub data: Bytes,
    /// Definition count followed by every record length
    pub index: Bytes,
}

/// Encodes definitions of one type into config entries
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigEncoder;

impl ConfigEncoder {
    /// Encode definitions in order; ids are taken from position, not `id()`
    pub fn encode<D: ConfigDefinition>(definitions: &[D]) -> Result<EncodedEntry> {
        let count = u16::try_from(definitions.len())
            .map_err(|_| ConfigError::TooManyDefinitions(definitions.len()))?;

        let mut data = BytesMut::new();
        let mut index = BytesMut::with_capacity(2 + 2 * definitions.len());
        data.put_u16(count);
        index.put_u16(count);

        for definition in definitions {
            let record = definition.encode()?;
            let size = u16::try_from(record.len()).map_err(|_| ConfigError::DefinitionTooLarge {
                id: definition.id(),
                size: record.len(),
            })?;
            index.put_u16(size);
            data.extend_from_slice(&record);
        }

        Ok(EncodedEntry {
            data: data.freeze(),
            index: index.freeze(),
        })
    }

    /// Encode definitions and store both entries in `archive`
    pub fn write<D: ConfigDefinition>(archive: &mut Archive, definitions: &[D]) -> Result<()> {
        let encoded = Self::encode(definitions)?;
        archive.insert(&data_entry_name::<D>(), encoded.data);
        archive.insert(&index_entry_name::<D>(), encoded.index);
        debug!(
            entry = D::ENTRY_NAME,
            count = definitions.len(),
            "encoded config entry"
        );
        Ok(())
    }
}
