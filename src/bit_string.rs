//! BIT STRING contents and Kerberos flag sets.

use crate::{ErrorKind, Result, Tag};
use alloc::vec::Vec;

/// Decoded BIT STRING: bits in transmission order, most significant bit of each byte first.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Decode contents octets: an unused-bit count (0-7) followed by the packed bits.
    pub fn from_der(contents: &[u8]) -> Result<Self> {
        let (unused, packed) = match contents.split_first() {
            Some((unused, packed)) => (usize::from(*unused), packed),
            None => return Err(ErrorKind::Length { tag: Tag::BIT_STRING }.into()),
        };
        if unused > 7 || (packed.is_empty() && unused != 0) {
            return Err(ErrorKind::Value { tag: Tag::BIT_STRING }.into());
        }

        let len = 8 * packed.len() - unused;
        let bits = (0..len)
            .map(|i| packed[i / 8] & (0x80 >> (i % 8)) != 0)
            .collect();
        Ok(Self { bits })
    }

    /// Encode as contents octets, padding the last byte with zero bits.
    pub fn to_der(&self) -> Vec<u8> {
        let unused = (8 - self.bits.len() % 8) % 8;
        let mut contents = Vec::with_capacity(1 + (self.bits.len() + 7) / 8);
        contents.push(unused as u8);
        for chunk in self.bits.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, bit)| if *bit { byte | (0x80 >> i) } else { byte });
            contents.push(byte);
        }
        contents
    }

    /// Build the 32-bit flag set Kerberos uses for `KDCOptions` and `TicketFlags`:
    /// flag `n` is bit `n` of the string, i.e. bit `31 - n` of `flags`.
    pub fn from_flags_u32(flags: u32) -> Self {
        Self {
            bits: (0..32).map(|n| flags & (0x8000_0000 >> n) != 0).collect(),
        }
    }

    /// Inverse of [`BitString::from_flags_u32`]. Bits past the 32nd are ignored, missing
    /// bits read as clear.
    pub fn to_flags_u32(&self) -> u32 {
        self.bits
            .iter()
            .take(32)
            .enumerate()
            .fold(0u32, |flags, (n, bit)| if *bit { flags | (0x8000_0000 >> n) } else { flags })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}
