//! Two's-complement INTEGER and ENUMERATED contents.

use crate::{ErrorKind, Result, Tag};
use alloc::vec::Vec;
use core::convert::TryFrom;

/// Borrowed INTEGER contents: big-endian two's complement of arbitrary width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Integer<'a> {
    bytes: &'a [u8],
}

impl<'a> Integer<'a> {
    /// Wrap INTEGER contents; an empty encoding is malformed.
    pub(crate) fn new(tag: Tag, bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ErrorKind::Length { tag }.into());
        }
        Ok(Self { bytes })
    }

    /// Raw big-endian two's-complement bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn is_negative(&self) -> bool {
        self.bytes.first().map_or(false, |msb| msb & 0x80 != 0)
    }

    /// Narrow to `i64`.
    ///
    /// Lossy if misused: encodings wider than eight bytes are truncated to their low-order
    /// eight bytes without any check. Kerberos `Int32`/`Microseconds` fields always fit.
    pub fn to_i64(&self) -> i64 {
        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 8];
        let take = self.bytes.len().min(8);
        buf[8 - take..].copy_from_slice(&self.bytes[self.bytes.len() - take..]);
        i64::from_be_bytes(buf)
    }

    /// Narrow to `i32`, truncating like [`Integer::to_i64`].
    pub fn to_i32(&self) -> i32 {
        self.to_i64() as i32
    }

    /// Checked conversion for unsigned fields such as `UInt32` nonces.
    pub fn to_u32(&self) -> Result<u32> {
        let significant = match self.bytes {
            [0x00, rest @ ..] => rest,
            all => all,
        };
        if self.is_negative() || significant.len() > 4 {
            return Err(ErrorKind::Overflow.into());
        }
        Ok(significant.iter().fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte)))
    }
}

impl TryFrom<Integer<'_>> for i32 {
    type Error = crate::Error;

    /// Checked narrowing, unlike [`Integer::to_i32`].
    fn try_from(integer: Integer<'_>) -> Result<i32> {
        i32::try_from(integer.to_i64())
            .ok()
            .filter(|_| integer.bytes.len() <= 8)
            .ok_or_else(|| ErrorKind::Overflow.into())
    }
}

/// Minimal two's-complement encoding of `value`.
pub(crate) fn encode_i64(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    // drop a leading byte while the next one still carries the sign
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Minimal two's-complement encoding of a non-negative `value`.
pub(crate) fn encode_u32(value: u32) -> Vec<u8> {
    encode_i64(i64::from(value))
}
