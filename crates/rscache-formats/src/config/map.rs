//! Property maps and the definition decode loop
//!
//! Every definition type owns one [`DefaultDefinition`]: a template listing
//! each property it knows, with defaults and codecs. Decoding a record copies
//! the template into a fresh [`PropertyMap`] and overrides the properties named
//! by the record's opcodes.
//!
//! Record layout:
//!
//! ```text
//! (opcode: u8, payload)* 0x00
//! ```

use crate::config::buffer::BufExt;
use crate::config::config_property::{ConfigProperty, SerializableProperty};
use crate::config::error::{ConfigError, Result};
use crate::config::property::PropertyValue;
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;
use tracing::trace;

/// Opcode that ends a definition record
pub const DEFINITION_TERMINATOR: u8 = 0;

/// Properties of one definition, keyed by index
#[derive(Debug, Default)]
pub struct PropertyMap {
    properties: BTreeMap<u8, Box<dyn SerializableProperty>>,
}

impl PropertyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, replacing any property with the same index
    pub fn insert<V: PropertyValue>(&mut self, property: ConfigProperty<V>) {
        self.insert_boxed(Box::new(property));
    }

    /// Add a type-erased property, replacing any property with the same index
    pub fn insert_boxed(&mut self, property: Box<dyn SerializableProperty>) {
        self.properties
            .insert(property.property_type().index(), property);
    }

    /// Whether a property exists for `index`
    pub fn contains(&self, index: u8) -> bool {
        self.properties.contains_key(&index)
    }

    /// Type-erased property for `index`
    pub fn get(&self, index: u8) -> Option<&dyn SerializableProperty> {
        self.properties.get(&index).map(as_dyn)
    }

    /// Typed property for `index`
    ///
    /// Returns `None` if the index is unknown or holds another value type.
    pub fn get_typed<V: PropertyValue>(&self, index: u8) -> Option<&ConfigProperty<V>> {
        self.properties.get(&index)?.as_any().downcast_ref()
    }

    /// Typed mutable property for `index`
    pub fn get_typed_mut<V: PropertyValue>(&mut self, index: u8) -> Option<&mut ConfigProperty<V>> {
        self.properties.get_mut(&index)?.as_any_mut().downcast_mut()
    }

    /// Effective value of the property at `index`
    pub fn value<V: PropertyValue>(&self, index: u8) -> Option<&V> {
        self.get_typed::<V>(index).map(|property| property.value())
    }

    /// Override the value of the property at `index`
    ///
    /// Returns `false` if the index is unknown or holds another value type.
    pub fn set_value<V: PropertyValue>(&mut self, index: u8, value: V) -> bool {
        match self.get_typed_mut::<V>(index) {
            Some(property) => {
                property.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Clear the override at `index`, returning whether the index exists
    pub fn reset(&mut self, index: u8) -> bool {
        match self.properties.get_mut(&index) {
            Some(property) => {
                property.reset();
                true
            }
            None => false,
        }
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the map has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.properties.keys().copied()
    }

    /// Properties in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = &dyn SerializableProperty> {
        self.properties.values().map(as_dyn)
    }

    /// Properties that carry an override, in ascending index order
    pub fn overridden(&self) -> impl Iterator<Item = &dyn SerializableProperty> {
        self.iter().filter(|property| property.is_overridden())
    }

    /// Decode one record into this map
    ///
    /// Reads `(opcode, payload)` pairs until the terminator. Every opcode must
    /// already be present in the map; `definition` names the definition type
    /// in errors. The map is only updated if the whole record decodes.
    pub fn decode_record(&mut self, buf: &mut Bytes, definition: &'static str) -> Result<()> {
        let mut decoded = self.clone();
        decoded.decode_in_place(buf, definition)?;
        *self = decoded;
        Ok(())
    }

    /// Decode one record, overriding properties as their opcodes are read
    fn decode_in_place(&mut self, buf: &mut Bytes, definition: &'static str) -> Result<()> {
        loop {
            let opcode = buf.read_u8()?;
            if opcode == DEFINITION_TERMINATOR {
                return Ok(());
            }

            let property = self
                .properties
                .get_mut(&opcode)
                .ok_or(ConfigError::UnknownProperty { opcode, definition })?;
            trace!(definition, opcode, "decoding property");
            property.decode(buf)?;
        }
    }

    /// Encode every overridden property, in ascending index order, followed
    /// by the terminator
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        for property in self.overridden() {
            let encoded = property.encode()?;
            buf.reserve(1 + encoded.len());
            buf.put_u8(property.property_type().index());
            buf.extend_from_slice(&encoded);
        }
        buf.put_u8(DEFINITION_TERMINATOR);
        Ok(buf.freeze())
    }
}

#[allow(clippy::borrowed_box)]
fn as_dyn(property: &Box<dyn SerializableProperty>) -> &dyn SerializableProperty {
    &**property
}

impl Clone for PropertyMap {
    fn clone(&self) -> Self {
        Self {
            properties: self
                .properties
                .iter()
                .map(|(index, property)| (*index, property.duplicate()))
                .collect(),
        }
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.properties.len() == other.properties.len()
            && self
                .properties
                .iter()
                .zip(&other.properties)
                .all(|((a_index, a), (b_index, b))| a_index == b_index && a.dyn_eq(&**b))
    }
}

/// Template properties shared by every record of one definition type
///
/// Built once and never mutated afterwards; records work on copies made by
/// [`DefaultDefinition::to_property_map`].
#[derive(Debug)]
pub struct DefaultDefinition {
    name: &'static str,
    properties: PropertyMap,
}

impl DefaultDefinition {
    /// Create a template for the definition type named `name`
    pub fn new(name: &'static str, properties: PropertyMap) -> Self {
        Self { name, properties }
    }

    /// Definition type name, e.g. `idk`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The template properties
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Fresh map holding a copy of every default property
    pub fn to_property_map(&self) -> PropertyMap {
        self.properties.clone()
    }

    /// Decode one record on top of a copy of the defaults
    ///
    /// On error the partially decoded copy is dropped; nothing shared changes.
    pub fn decode(&self, buf: &mut Bytes) -> Result<PropertyMap> {
        let mut properties = self.to_property_map();
        properties.decode_in_place(buf, self.name)?;
        Ok(properties)
    }
}
