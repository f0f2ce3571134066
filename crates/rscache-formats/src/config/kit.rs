//! Identity kit definitions
//!
//! Identity kits are the interchangeable body parts (hair, jaw, torso, ...)
//! a player model is assembled from.
//!
//! | Opcode  | Property              | Payload                    | Default |
//! |---------|-----------------------|----------------------------|---------|
//! | 1       | part                  | `u8` part id               | none    |
//! | 2       | models                | `u8` count, `u16` per id   | absent  |
//! | 3       | player design style   | none (presence flag)       | `false` |
//! | 40..=49 | original colour 1-10  | `u16`                      | `0`     |
//! | 50..=59 | replacement colour    | `u16`                      | `0`     |
//! | 60..=69 | head model 1-10       | `u16`                      | `-1`    |

use crate::config::buffer::BufExt;
use crate::config::codec::{self, PropertyCodec};
use crate::config::config_property::ConfigProperty;
use crate::config::definition::ConfigDefinition;
use crate::config::map::{DefaultDefinition, PropertyMap};
use crate::config::property::{ConfigPropertyType, PropertyValue};
use bytes::BufMut;
use std::sync::OnceLock;

/// Number of recolourable colour slots
pub const COLOUR_COUNT: usize = 10;

/// Number of head model slots
pub const HEAD_MODEL_COUNT: usize = 10;

/// Opcode of the body part property
pub const PART: u8 = 1;

/// Opcode of the body models property
pub const MODELS: u8 = 2;

/// Opcode of the player design style flag
pub const PLAYER_DESIGN_STYLE: u8 = 3;

/// Opcode before the first original colour slot
const ORIGINAL_COLOUR_BASE: u8 = 39;

/// Opcode before the first replacement colour slot
const REPLACEMENT_COLOUR_BASE: u8 = 49;

/// Opcode before the first head model slot
const HEAD_MODEL_BASE: u8 = 59;

/// Head model value meaning "no model"
pub const NO_MODEL: i32 = -1;

static DEFAULTS: OnceLock<DefaultDefinition> = OnceLock::new();

/// Body part an identity kit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Part {
    /// No part assigned
    #[default]
    Null,
    /// Male hair
    MaleHair,
    /// Male jaw
    MaleJaw,
    /// Male torso
    MaleTorso,
    /// Male arms
    MaleArms,
    /// Male hands
    MaleHands,
    /// Male legs
    MaleLegs,
    /// Male feet
    MaleFeet,
    /// Female hair
    FemaleHair,
    /// Female jaw
    FemaleJaw,
    /// Female torso
    FemaleTorso,
    /// Female arms
    FemaleArms,
    /// Female hands
    FemaleHands,
    /// Female legs
    FemaleLegs,
    /// Female feet
    FemaleFeet,
    /// Part id outside the known range
    Other(u8),
}

impl Part {
    /// Id written for [`Part::Null`]
    pub const NULL_ID: u8 = 0xFF;

    /// Map a part id to a part
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => Self::MaleHair,
            1 => Self::MaleJaw,
            2 => Self::MaleTorso,
            3 => Self::MaleArms,
            4 => Self::MaleHands,
            5 => Self::MaleLegs,
            6 => Self::MaleFeet,
            7 => Self::FemaleHair,
            8 => Self::FemaleJaw,
            9 => Self::FemaleTorso,
            10 => Self::FemaleArms,
            11 => Self::FemaleHands,
            12 => Self::FemaleLegs,
            13 => Self::FemaleFeet,
            Self::NULL_ID => Self::Null,
            other => Self::Other(other),
        }
    }

    /// The part id
    pub fn id(self) -> u8 {
        match self {
            Self::MaleHair => 0,
            Self::MaleJaw => 1,
            Self::MaleTorso => 2,
            Self::MaleArms => 3,
            Self::MaleHands => 4,
            Self::MaleLegs => 5,
            Self::MaleFeet => 6,
            Self::FemaleHair => 7,
            Self::FemaleJaw => 8,
            Self::FemaleTorso => 9,
            Self::FemaleArms => 10,
            Self::FemaleHands => 11,
            Self::FemaleLegs => 12,
            Self::FemaleFeet => 13,
            Self::Null => Self::NULL_ID,
            Self::Other(id) => id,
        }
    }

    fn codec() -> PropertyCodec<Self> {
        PropertyCodec::fixed(
            |buf| buf.read_u8().map(Self::from_id),
            |buf, part: &Self| buf.put_u8(part.id()),
            1,
        )
    }
}

impl PropertyValue for Part {}

/// Build the identity kit template
fn build_defaults() -> DefaultDefinition {
    let mut defaults = PropertyMap::new();

    defaults.insert(ConfigProperty::new(
        ConfigPropertyType::new(PART, "part"),
        Part::Null,
        Part::codec(),
    ));
    defaults.insert(ConfigProperty::new(
        ConfigPropertyType::new(MODELS, "models"),
        None,
        codec::optional(codec::short_list()),
    ));
    defaults.insert(ConfigProperty::new(
        ConfigPropertyType::new(PLAYER_DESIGN_STYLE, "player_design_style"),
        false,
        codec::always_true(),
    ));

    for slot in 1..=COLOUR_COUNT {
        defaults.insert(ConfigProperty::new(
            ConfigPropertyType::numbered(
                ORIGINAL_COLOUR_BASE + slot as u8,
                "original_colour",
                slot,
            ),
            0,
            codec::unsigned_short(),
        ));
        defaults.insert(ConfigProperty::new(
            ConfigPropertyType::numbered(
                REPLACEMENT_COLOUR_BASE + slot as u8,
                "replacement_colour",
                slot,
            ),
            0,
            codec::unsigned_short(),
        ));
    }

    for slot in 1..=HEAD_MODEL_COUNT {
        defaults.insert(ConfigProperty::new(
            ConfigPropertyType::numbered(HEAD_MODEL_BASE + slot as u8, "head_model", slot),
            NO_MODEL,
            codec::unsigned_short(),
        ));
    }

    DefaultDefinition::new(IdentityKitDefinition::ENTRY_NAME, defaults)
}

/// Opcode for a 1-based slot, if the slot is in range
fn slot_opcode(base: u8, slot: usize, count: usize) -> Option<u8> {
    (1..=count).contains(&slot).then(|| base + slot as u8)
}

/// A decoded identity kit
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityKitDefinition {
    id: u16,
    properties: PropertyMap,
}

impl IdentityKitDefinition {
    /// Body part this kit applies to
    pub fn part(&self) -> Part {
        self.properties
            .value::<Part>(PART)
            .copied()
            .unwrap_or_default()
    }

    /// Body model ids, if the kit has any
    pub fn models(&self) -> Option<&[u16]> {
        self.properties
            .value::<Option<Vec<u16>>>(MODELS)?
            .as_deref()
    }

    /// Whether the kit is selectable during player design
    pub fn player_design_style(&self) -> bool {
        self.properties
            .value::<bool>(PLAYER_DESIGN_STYLE)
            .copied()
            .unwrap_or(false)
    }

    /// Original colour in a 1-based slot
    pub fn original_colour(&self, slot: usize) -> Option<i32> {
        let opcode = slot_opcode(ORIGINAL_COLOUR_BASE, slot, COLOUR_COUNT)?;
        self.properties.value::<i32>(opcode).copied()
    }

    /// Replacement colour in a 1-based slot
    pub fn replacement_colour(&self, slot: usize) -> Option<i32> {
        let opcode = slot_opcode(REPLACEMENT_COLOUR_BASE, slot, COLOUR_COUNT)?;
        self.properties.value::<i32>(opcode).copied()
    }

    /// Head model in a 1-based slot; [`NO_MODEL`] when unset
    pub fn head_model(&self, slot: usize) -> Option<i32> {
        let opcode = slot_opcode(HEAD_MODEL_BASE, slot, HEAD_MODEL_COUNT)?;
        self.properties.value::<i32>(opcode).copied()
    }

    /// Set the body part
    pub fn set_part(&mut self, part: Part) {
        self.properties.set_value(PART, part);
    }

    /// Set the body model ids
    pub fn set_models(&mut self, models: Vec<u16>) {
        self.properties.set_value(MODELS, Some(models));
    }

    /// Replace the colour in a 1-based slot; returns `false` for a bad slot
    pub fn set_recolour(&mut self, slot: usize, original: i32, replacement: i32) -> bool {
        match (
            slot_opcode(ORIGINAL_COLOUR_BASE, slot, COLOUR_COUNT),
            slot_opcode(REPLACEMENT_COLOUR_BASE, slot, COLOUR_COUNT),
        ) {
            (Some(from), Some(to)) => {
                self.properties.set_value(from, original)
                    && self.properties.set_value(to, replacement)
            }
            _ => false,
        }
    }
}

impl ConfigDefinition for IdentityKitDefinition {
    const ENTRY_NAME: &'static str = "idk";

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
