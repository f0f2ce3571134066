//! Binary codecs bound to individual properties
//!
//! A [`PropertyCodec`] carries the operations a property needs to move
//! between its value and the record bytes: decode, encode and size, plus a
//! validation check run before encoding. Codecs are stateless and reference
//! counted, so duplicating a property shares them.
//!
//! Multi-byte integers are big-endian and unsigned unless a codec says
//! otherwise.

use crate::config::buffer::{BufExt, BufMutExt, string_size};
use crate::config::error::{ConfigError, Result};
use crate::config::property::PropertyValue;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::sync::Arc;

type DecodeFn<V> = dyn Fn(&mut Bytes) -> Result<V> + Send + Sync;
type EncodeFn<V> = dyn Fn(&mut BytesMut, &V) + Send + Sync;
type SizeFn<V> = dyn Fn(&V) -> usize + Send + Sync;
type ValidateFn<V> = dyn Fn(&V) -> Result<()> + Send + Sync;

/// Longest list a byte count prefix can describe
pub const MAX_LIST_LENGTH: usize = u8::MAX as usize;

/// Decode, encode and size operations for one value type
pub struct PropertyCodec<V> {
    decode: Arc<DecodeFn<V>>,
    encode: Arc<EncodeFn<V>>,
    size: Arc<SizeFn<V>>,
    validate: Option<Arc<ValidateFn<V>>>,
}

impl<V> PropertyCodec<V> {
    /// Create a codec from its three operations
    ///
    /// `size` must return exactly the number of bytes `encode` writes.
    pub fn new<D, E, S>(decode: D, encode: E, size: S) -> Self
    where
        D: Fn(&mut Bytes) -> Result<V> + Send + Sync + 'static,
        E: Fn(&mut BytesMut, &V) + Send + Sync + 'static,
        S: Fn(&V) -> usize + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            encode: Arc::new(encode),
            size: Arc::new(size),
            validate: None,
        }
    }

    /// Reject values this codec cannot represent before they are encoded
    pub fn with_validation<F>(mut self, validate: F) -> Self
    where
        F: Fn(&V) -> Result<()> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Create a codec whose encoded size does not depend on the value
    pub fn fixed<D, E>(decode: D, encode: E, size: usize) -> Self
    where
        D: Fn(&mut Bytes) -> Result<V> + Send + Sync + 'static,
        E: Fn(&mut BytesMut, &V) + Send + Sync + 'static,
    {
        Self::new(decode, encode, move |_| size)
    }

    /// Read a value, advancing `buf` past it
    pub fn decode(&self, buf: &mut Bytes) -> Result<V> {
        (self.decode)(buf)
    }

    /// Check that a value can be encoded
    pub fn validate(&self, value: &V) -> Result<()> {
        self.validate.as_ref().map_or(Ok(()), |validate| validate(value))
    }

    /// Write a value that passed [`PropertyCodec::validate`]
    pub fn encode(&self, buf: &mut BytesMut, value: &V) {
        (self.encode)(buf, value);
    }

    /// Encoded size of a value in bytes
    pub fn size_of(&self, value: &V) -> usize {
        (self.size)(value)
    }
}

impl<V> Clone for PropertyCodec<V> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
            encode: Arc::clone(&self.encode),
            size: Arc::clone(&self.size),
            validate: self.validate.clone(),
        }
    }
}

impl<V> fmt::Debug for PropertyCodec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCodec").finish_non_exhaustive()
    }
}

/// One unsigned byte
pub fn unsigned_byte() -> PropertyCodec<u8> {
    PropertyCodec::fixed(|buf| buf.read_u8(), |buf, value| buf.put_u8(*value), 1)
}

/// One big-endian unsigned short, held as `i32`
///
/// Values are truncated to their low 16 bits when written, so a `-1`
/// sentinel encodes as `0xFFFF` and decodes back as `65535`.
pub fn unsigned_short() -> PropertyCodec<i32> {
    PropertyCodec::fixed(
        |buf| buf.read_u16().map(i32::from),
        |buf, value| buf.put_u16(*value as u16),
        2,
    )
}

/// A newline-terminated string
pub fn string() -> PropertyCodec<String> {
    PropertyCodec::new(
        |buf| buf.read_string(),
        |buf, value: &String| buf.put_string(value),
        |value| string_size(value),
    )
}

/// A presence flag: the opcode alone means `true`, no payload follows
pub fn always_true() -> PropertyCodec<bool> {
    PropertyCodec::fixed(|_| Ok(true), |_, _| {}, 0)
}

/// A byte count followed by that many big-endian unsigned shorts
///
/// Lists longer than [`MAX_LIST_LENGTH`] fail validation with
/// [`ConfigError::ListTooLong`].
pub fn short_list() -> PropertyCodec<Vec<u16>> {
    PropertyCodec::new(
        |buf| {
            let count = buf.read_u8()?;
            (0..count).map(|_| buf.read_u16()).collect()
        },
        |buf, values: &Vec<u16>| {
            buf.put_u8(values.len() as u8);
            for value in values {
                buf.put_u16(*value);
            }
        },
        |values| 1 + 2 * values.len(),
    )
    .with_validation(|values| {
        if values.len() > MAX_LIST_LENGTH {
            return Err(ConfigError::ListTooLong {
                length: values.len(),
                max: MAX_LIST_LENGTH,
            });
        }
        Ok(())
    })
}

/// Wrap a codec so that `None` acts as the absent sentinel
///
/// Decoding always yields `Some`. `None` is never written: a property whose
/// effective value is `None` reports a missing value instead of encoding.
pub fn optional<V: PropertyValue>(inner: PropertyCodec<V>) -> PropertyCodec<Option<V>> {
    let decoder = inner.clone();
    let encoder = inner.clone();
    let sizer = inner.clone();
    PropertyCodec::new(
        move |buf| decoder.decode(buf).map(Some),
        move |buf, value: &Option<V>| {
            if let Some(value) = value {
                encoder.encode(buf, value);
            }
        },
        move |value| value.as_ref().map_or(0, |value| sizer.size_of(value)),
    )
    .with_validation(move |value| value.as_ref().map_or(Ok(()), |value| inner.validate(value)))
}
