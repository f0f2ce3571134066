//! Parameter variable ("varp") definitions

use crate::config::codec;
use crate::config::config_property::ConfigProperty;
use crate::config::definition::ConfigDefinition;
use crate::config::map::{DefaultDefinition, PropertyMap};
use crate::config::property::ConfigPropertyType;
use std::sync::OnceLock;

/// Opcode of the parameter property
pub const PARAMETER: u8 = 5;

static DEFAULTS: OnceLock<DefaultDefinition> = OnceLock::new();

fn build_defaults() -> DefaultDefinition {
    let mut defaults = PropertyMap::new();
    defaults.insert(ConfigProperty::new(
        ConfigPropertyType::new(PARAMETER, "parameter"),
        0,
        codec::unsigned_short(),
    ));
    DefaultDefinition::new(ParameterVariableDefinition::ENTRY_NAME, defaults)
}

/// A decoded varp
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterVariableDefinition {
    id: u16,
    properties: PropertyMap,
}

impl ParameterVariableDefinition {
    /// The parameter value
    pub fn parameter(&self) -> i32 {
        self.properties
            .value::<i32>(PARAMETER)
            .copied()
            .unwrap_or_default()
    }

    /// Set the parameter value; only the low 16 bits are encoded
    pub fn set_parameter(&mut self, parameter: i32) {
        self.properties.set_value(PARAMETER, parameter);
    }
}

impl ConfigDefinition for ParameterVariableDefinition {
    const ENTRY_NAME: &'static str = "varp";

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

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::error::ConfigError;
    use bytes::Bytes;

    #[test]
    fn test_parameter_round_trip() {
        let mut definition = ParameterVariableDefinition::with_defaults(3);
        assert_eq!(definition.parameter(), 0);

        definition.set_parameter(1000);
        let mut encoded = definition.encode().expect("encode");
        assert_eq!(encoded.as_ref(), &[5, 0x03, 0xE8, 0]);

        let decoded = ParameterVariableDefinition::decode(3, &mut encoded).expect("decode");
        assert_eq!(decoded, definition);
    }

    #[test]
    fn test_explicit_default_is_not_distinct() {
        let mut buf = Bytes::from_static(&[5, 0, 0, 0]);
        let decoded = ParameterVariableDefinition::decode(0, &mut buf).expect("decode");
        assert_eq!(decoded, ParameterVariableDefinition::with_defaults(0));
    }

    #[test]
    fn test_other_opcodes_rejected() {
        let mut buf = Bytes::from_static(&[1, 0]);
        assert!(matches!(
            ParameterVariableDefinition::decode(0, &mut buf),
            Err(ConfigError::UnknownProperty {
                opcode: 1,
                definition: "varp"
            })
        ));
    }
}
