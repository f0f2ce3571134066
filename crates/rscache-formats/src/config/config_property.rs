//! Properties that know how to read and write themselves

use crate::config::codec::PropertyCodec;
use crate::config::error::{ConfigError, Result};
use crate::config::property::{ConfigPropertyType, Property, PropertyValue};
use bytes::{Bytes, BytesMut};
use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// A [`Property`] with its binary codec bound at construction
#[derive(Debug, Clone)]
pub struct ConfigProperty<V> {
    property: Property<V>,
    codec: PropertyCodec<V>,
}

impl<V: PropertyValue> ConfigProperty<V> {
    /// Create a property holding only its default
    pub fn new(property_type: ConfigPropertyType, default: V, codec: PropertyCodec<V>) -> Self {
        Self {
            property: Property::new(property_type, default),
            codec,
        }
    }

    /// The bound codec
    pub fn codec(&self) -> &PropertyCodec<V> {
        &self.codec
    }

    /// Decode a value from `buf` and store it as the override
    pub fn decode(&mut self, buf: &mut Bytes) -> Result<()> {
        let value = self.codec.decode(buf)?;
        trace!(
            opcode = self.property.property_type().index(),
            property = self.property.property_type().name(),
            ?value,
            "decoded property"
        );
        self.property.set_value(value);
        Ok(())
    }

    /// Encode the effective value into a buffer sized exactly to it
    pub fn encode(&self) -> Result<Bytes> {
        let value = self.property.value();
        if !value.is_present() {
            let property_type = self.property.property_type();
            return Err(ConfigError::MissingValue {
                opcode: property_type.index(),
                name: property_type.name().to_string(),
            });
        }

        self.codec.validate(value)?;
        let size = self.codec.size_of(value);
        let mut buf = BytesMut::with_capacity(size);
        self.codec.encode(&mut buf, value);
        debug_assert_eq!(
            buf.len(),
            size,
            "codec for {} wrote a different size than it reported",
            self.property.property_type().name()
        );

        Ok(buf.freeze())
    }

    /// Copy this property, sharing its codec and keeping any override
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl<V> Deref for ConfigProperty<V> {
    type Target = Property<V>;

    fn deref(&self) -> &Self::Target {
        &self.property
    }
}

impl<V> DerefMut for ConfigProperty<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.property
    }
}

impl<V: PartialEq> PartialEq for ConfigProperty<V> {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
    }
}

/// Type-erased view of a [`ConfigProperty`]
///
/// Lets one map hold properties of different value types while driving them
/// through the same decode and encode loop.
pub trait SerializableProperty: fmt::Debug + Send + Sync {
    /// The property identity
    fn property_type(&self) -> &ConfigPropertyType;

    /// Decode a value from `buf` and store it as the override
    fn decode(&mut self, buf: &mut Bytes) -> Result<()>;

    /// Encode the effective value
    fn encode(&self) -> Result<Bytes>;

    /// Whether an override is present
    fn is_overridden(&self) -> bool;

    /// Clear the override
    fn reset(&mut self);

    /// Copy this property behind a new box
    fn duplicate(&self) -> Box<dyn SerializableProperty>;

    /// Upcast for typed access
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable access
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Compare with another property of possibly different value type
    fn dyn_eq(&self, other: &dyn SerializableProperty) -> bool;
}

impl<V: PropertyValue> SerializableProperty for ConfigProperty<V> {
    fn property_type(&self) -> &ConfigPropertyType {
        self.property.property_type()
    }

    fn decode(&mut self, buf: &mut Bytes) -> Result<()> {
        Self::decode(self, buf)
    }

    fn encode(&self) -> Result<Bytes> {
        Self::encode(self)
    }

    fn is_overridden(&self) -> bool {
        self.property.is_overridden()
    }

    fn reset(&mut self) {
        self.property.reset();
    }

    fn duplicate(&self) -> Box<dyn SerializableProperty> {
        Box::new(Self::duplicate(self))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn SerializableProperty) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}
