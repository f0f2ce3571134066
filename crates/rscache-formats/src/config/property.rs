//! Property identities and value cells
//!
//! A [`Property`] pairs a [`ConfigPropertyType`] with a definition-wide default
//! and an optional per-record override. Reads resolve the override first and
//! fall back to the default.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of one property slot in a definition
///
/// The index doubles as the opcode that introduces the property in a binary
/// record. Equality and hashing consider the index only; the name is kept for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigPropertyType {
    index: u8,
    name: Cow<'static, str>,
}

impl ConfigPropertyType {
    /// Create a property type with a static name
    pub const fn new(index: u8, name: &'static str) -> Self {
        Self {
            index,
            name: Cow::Borrowed(name),
        }
    }

    /// Create a property type with a name built at runtime
    pub fn dynamic(index: u8, name: impl Into<String>) -> Self {
        Self {
            index,
            name: Cow::Owned(name.into()),
        }
    }

    /// Create one of a numbered family of properties, e.g. `head_model_3`
    pub fn numbered(index: u8, prefix: &str, slot: usize) -> Self {
        Self::dynamic(index, format!("{prefix}_{slot}"))
    }

    /// Property index (the record opcode)
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Canonical `snake_case` name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable name: underscores become spaces and the first letter is capitalised
    pub fn formatted_name(&self) -> String {
        let spaced = self.name.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl PartialEq for ConfigPropertyType {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ConfigPropertyType {}

impl Hash for ConfigPropertyType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Display for ConfigPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_name())
    }
}

/// A value type that can be stored in a config property
///
/// `is_present` reports whether the value can be encoded. Only absent
/// sentinels such as `None` return `false`.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Whether this value is something other than the absent sentinel
    fn is_present(&self) -> bool {
        true
    }
}

macro_rules! impl_property_value {
    ($($ty:ty),* $(,)?) => {
        $(impl PropertyValue for $ty {})*
    };
}

impl_property_value!(bool, u8, u16, u32, i32, String);

impl<T: PropertyValue> PropertyValue for Vec<T> {}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// A value cell with a default and an optional override
#[derive(Debug, Clone)]
pub struct Property<V> {
    property_type: ConfigPropertyType,
    value: Option<V>,
    default: V,
}

impl<V> Property<V> {
    /// Create a property holding only its default
    pub fn new(property_type: ConfigPropertyType, default: V) -> Self {
        Self {
            property_type,
            value: None,
            default,
        }
    }

    /// Create a property with an explicit override
    pub fn with_value(property_type: ConfigPropertyType, value: V, default: V) -> Self {
        Self {
            property_type,
            value: Some(value),
            default,
        }
    }

    /// The property identity
    pub fn property_type(&self) -> &ConfigPropertyType {
        &self.property_type
    }

    /// Human readable property name
    pub fn name(&self) -> String {
        self.property_type.formatted_name()
    }

    /// Effective value: the override if set, otherwise the default
    pub fn value(&self) -> &V {
        self.value.as_ref().unwrap_or(&self.default)
    }

    /// The definition-wide default
    pub fn default_value(&self) -> &V {
        &self.default
    }

    /// Store an explicit override
    ///
    /// Setting the default value (or an absent sentinel) still counts as an
    /// override; use [`Property::reset`] to fall back to the default.
    pub fn set_value(&mut self, value: V) {
        self.value = Some(value);
    }

    /// Clear the override
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Whether an override is present
    pub fn is_overridden(&self) -> bool {
        self.value.is_some()
    }
}

// Equality follows the effective value, not where it came from.
impl<V: PartialEq> PartialEq for Property<V> {
    fn eq(&self, other: &Self) -> bool {
        self.property_type == other.property_type && self.value() == other.value()
    }
}

impl<V: Eq> Eq for Property<V> {}

impl<V: Hash> Hash for Property<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.property_type.hash(state);
        self.value().hash(state);
    }
}
