//! The length octets of a DER header.

use crate::{Decodable, Decoder, Encodable, Encoder, Error, ErrorKind, Result};
use core::{convert::TryFrom, fmt, ops::Add};

/// Long form marker: the low seven bits count the length bytes that follow.
const LONG_FORM_FLAG: u8 = 0x80;

/// Widest long form length field accepted, in bytes.
const MAX_LENGTH_OCTETS: u8 = 4;

/// Contents length, `0..=u32::MAX`.
///
/// - Lengths below 128 are a single byte (short form).
/// - Otherwise the first byte is `0x80 | n`, followed by `n` big-endian bytes holding the
///   length (long form). DER has no indefinite form, so `0x80` on its own is rejected.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Length(u32);

impl Length {
    pub const fn zero() -> Self {
        Length(0)
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// Number of big-endian bytes needed in the long form.
    fn long_form_octets(self) -> u8 {
        match self.0 {
            0..=0xFF => 1,
            0x100..=0xFFFF => 2,
            0x1_0000..=0xFF_FFFF => 3,
            _ => 4,
        }
    }
}

impl Add for Length {
    type Output = Result<Self>;

    fn add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Length)
            .ok_or_else(|| ErrorKind::Overflow.into())
    }
}

impl Add<usize> for Length {
    type Output = Result<Self>;

    fn add(self, other: usize) -> Result<Self> {
        self + Length::try_from(other)?
    }
}

impl From<u8> for Length {
    fn from(len: u8) -> Length {
        Length(u32::from(len))
    }
}

impl From<u16> for Length {
    fn from(len: u16) -> Length {
        Length(u32::from(len))
    }
}

impl From<u32> for Length {
    fn from(len: u32) -> Length {
        Length(len)
    }
}

impl From<Length> for u32 {
    fn from(len: Length) -> u32 {
        len.0
    }
}

impl From<Length> for usize {
    fn from(len: Length) -> usize {
        len.0 as usize
    }
}

impl TryFrom<usize> for Length {
    type Error = Error;

    fn try_from(len: usize) -> Result<Length> {
        u32::try_from(len)
            .map(Length)
            .map_err(|_| ErrorKind::Overflow.into())
    }
}

impl Decodable<'_> for Length {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Length> {
        match decoder.byte()? {
            len if len & LONG_FORM_FLAG == 0 => Ok(len.into()),
            LONG_FORM_FLAG => decoder.error(ErrorKind::InvalidLength),
            first => {
                let octets = first & !LONG_FORM_FLAG;
                if octets > MAX_LENGTH_OCTETS {
                    return decoder.error(ErrorKind::Overlength);
                }
                let be_len = decoder.bytes(octets)?;
                let len = be_len
                    .iter()
                    .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte));
                Ok(Length(len))
            }
        }
    }
}

impl Encodable for Length {
    fn encoded_len(&self) -> Result<Length> {
        match self.0 {
            0..=0x7F => Ok(Length(1)),
            _ => Ok(Length(1 + u32::from(self.long_form_octets()))),
        }
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        match self.0 {
            0..=0x7F => encoder.byte(self.0 as u8),
            _ => {
                let octets = self.long_form_octets();
                encoder.byte(LONG_FORM_FLAG | octets)?;
                encoder.bytes(&self.0.to_be_bytes()[4 - usize::from(octets)..])
            }
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
