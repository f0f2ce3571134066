//! Bit variable ("varbit") definitions
//!
//! A varbit names a contiguous bit range `low..=high` of a parameter
//! variable, letting several small values share one varp. Development caches
//! also carry a name for each varbit, read by [`NamedBitVariableDefinition`].

use crate::config::buffer::BufExt;
use crate::config::codec::{self, PropertyCodec};
use crate::config::config_property::ConfigProperty;
use crate::config::definition::ConfigDefinition;
use crate::config::map::{DefaultDefinition, PropertyMap};
use crate::config::property::{ConfigPropertyType, PropertyValue};
use bytes::BufMut;
use std::sync::OnceLock;

/// Opcode of the bit variable property
pub const VARIABLE: u8 = 1;

/// Opcode of the varbit name property
pub const NAME: u8 = 2;

static DEFAULTS: OnceLock<DefaultDefinition> = OnceLock::new();
static NAMED_DEFAULTS: OnceLock<DefaultDefinition> = OnceLock::new();

/// A bit range within a parameter variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitVariable {
    /// Id of the parameter variable holding the bits
    pub variable: u16,
    /// Lowest bit, inclusive
    pub low: u8,
    /// Highest bit, inclusive
    pub high: u8,
}

impl BitVariable {
    /// Create a bit variable over `low..=high` of `variable`
    pub const fn new(variable: u16, low: u8, high: u8) -> Self {
        Self {
            variable,
            low,
            high,
        }
    }

    /// Number of bits covered; zero if the range is inverted
    pub fn width(self) -> u32 {
        if self.high < self.low {
            0
        } else {
            u32::from(self.high - self.low) + 1
        }
    }

    /// Mask of the covered bits, before shifting into place
    pub fn mask(self) -> u32 {
        match self.width() {
            0 => 0,
            width if width >= 32 => u32::MAX,
            width => (1 << width) - 1,
        }
    }

    /// Read this bit range out of a parameter value
    pub fn extract(self, parameter: u32) -> u32 {
        parameter.checked_shr(u32::from(self.low)).unwrap_or(0) & self.mask()
    }

    /// Write `value` into this bit range of a parameter value
    ///
    /// Bits of `value` outside the range are discarded.
    pub fn insert(self, parameter: u32, value: u32) -> u32 {
        let shift = u32::from(self.low);
        let mask = self.mask().checked_shl(shift).unwrap_or(0);
        let bits = (value & self.mask()).checked_shl(shift).unwrap_or(0);
        (parameter & !mask) | bits
    }

    fn codec() -> PropertyCodec<Self> {
        PropertyCodec::fixed(
            |buf| {
                let variable = buf.read_u16()?;
                let low = buf.read_u8()?;
                let high = buf.read_u8()?;
                Ok(Self::new(variable, low, high))
            },
            |buf, bits: &Self| {
                buf.put_u16(bits.variable);
                buf.put_u8(bits.low);
                buf.put_u8(bits.high);
            },
            4,
        )
    }
}

impl PropertyValue for BitVariable {}

fn variable_properties() -> PropertyMap {
    let mut defaults = PropertyMap::new();
    defaults.insert(ConfigProperty::new(
        ConfigPropertyType::new(VARIABLE, "variable"),
        BitVariable::default(),
        BitVariable::codec(),
    ));
    defaults
}

fn build_defaults() -> DefaultDefinition {
    DefaultDefinition::new(BitVariableDefinition::ENTRY_NAME, variable_properties())
}

fn build_named_defaults() -> DefaultDefinition {
    let mut defaults = variable_properties();
    defaults.insert(ConfigProperty::new(
        ConfigPropertyType::new(NAME, "name"),
        None,
        codec::optional(codec::string()),
    ));
    DefaultDefinition::new(NamedBitVariableDefinition::ENTRY_NAME, defaults)
}

/// A decoded varbit
#[derive(Debug, Clone, PartialEq)]
pub struct BitVariableDefinition {
    id: u16,
    properties: PropertyMap,
}

impl BitVariableDefinition {
    /// The bit range this varbit covers
    pub fn variable(&self) -> BitVariable {
        self.properties
            .value::<BitVariable>(VARIABLE)
            .copied()
            .unwrap_or_default()
    }

    /// Set the bit range
    pub fn set_variable(&mut self, variable: BitVariable) {
        self.properties.set_value(VARIABLE, variable);
    }
}

impl ConfigDefinition for BitVariableDefinition {
    const ENTRY_NAME: &'static str = "varbit";

    fn defaults() -> &'static DefaultDefinition {
        DEFAULTS.get_or_init(build_defaults)
    }

    fn from_properties(id: u16, properties: PropertyMap) -> Self {
        Self { id, properties }
    }

    fn id(&self) -> u16 {
        self.id
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}

/// A varbit that also carries a name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedBitVariableDefinition {
    id: u16,
    properties: PropertyMap,
}

impl NamedBitVariableDefinition {
    /// The bit range this varbit covers
    pub fn variable(&self) -> BitVariable {
        self.properties
            .value::<BitVariable>(VARIABLE)
            .copied()
            .unwrap_or_default()
    }

    /// The varbit name, if the record has one
    pub fn name(&self) -> Option<&str> {
        self.properties.value::<Option<String>>(NAME)?.as_deref()
    }

    /// Set the bit range
    pub fn set_variable(&mut self, variable: BitVariable) {
        self.properties.set_value(VARIABLE, variable);
    }

    /// Set the varbit name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.properties.set_value(NAME, Some(name.into()));
    }
}

impl ConfigDefinition for NamedBitVariableDefinition {
    const ENTRY_NAME: &'static str = "varbit";

    fn defaults() -> &'static DefaultDefinition {
        NAMED_DEFAULTS.get_or_init(build_named_defaults)
    }

    fn from_properties(id: u16, properties: PropertyMap) -> Self {
        Self { id, properties }
    }

    fn id(&self) -> u16 {
        self.id
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}
