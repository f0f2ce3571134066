//! Bounds-checked reads over a byte cursor
//!
//! The `bytes` accessors panic when the buffer runs dry. Definition records
//! come from untrusted cache files, so every read used by a property codec
//! goes through [`BufExt`], which reports under-runs as
//! [`ConfigError::TruncatedRecord`] instead.

use crate::config::error::{ConfigError, Result};
use bytes::{Buf, BufMut};

/// Terminator byte of a legacy cache string
pub const STRING_TERMINATOR: u8 = 10;

/// Bounds-checked accessors for any [`Buf`]
pub trait BufExt: Buf {
    /// Fail unless at least `needed` bytes remain
    fn ensure_remaining(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(ConfigError::TruncatedRecord { needed, remaining });
        }
        Ok(())
    }

    /// Read an unsigned byte
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining(1)?;
        Ok(self.get_u8())
    }

    /// Read a big-endian unsigned short
    fn read_u16(&mut self) -> Result<u16> {
        self.ensure_remaining(2)?;
        Ok(self.get_u16())
    }

    /// Read a big-endian unsigned int
    fn read_u32(&mut self) -> Result<u32> {
        self.ensure_remaining(4)?;
        Ok(self.get_u32())
    }

    /// Read a byte as a boolean (any nonzero value is `true`)
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a newline-terminated Latin-1 string
    fn read_string(&mut self) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.read_u8()? {
                STRING_TERMINATOR => return Ok(value),
                byte => value.push(char::from(byte)),
            }
        }
    }
}

impl<B: Buf + ?Sized> BufExt for B {}

/// Writer counterparts for values that have no direct [`BufMut`] method
pub trait BufMutExt: BufMut {
    /// Write a newline-terminated Latin-1 string
    ///
    /// Characters outside Latin-1 are written as `?`.
    fn put_string(&mut self, value: &str) {
        for c in value.chars() {
            self.put_u8(u8::try_from(u32::from(c)).unwrap_or(b'?'));
        }
        self.put_u8(STRING_TERMINATOR);
    }
}

impl<B: BufMut + ?Sized> BufMutExt for B {}

/// Encoded size of a string written with [`BufMutExt::put_string`]
pub fn string_size(value: &str) -> usize {
    value.chars().count() + 1
}
