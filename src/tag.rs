use core::fmt;
use crate::{Decodable, Decoder, Encodable, Encoder, ErrorKind, Length, Result};

const CLASS_OFFSET: usize = 6;
const CONSTRUCTED_OFFSET: usize = 5;

/// Set for constructed encodings.
const CONSTRUCTED_FLAG: u8 = 1u8 << CONSTRUCTED_OFFSET;

/// Low five bits of the identifier octet all set: tag number follows in base-128
const HIGH_TAG_NUMBER_FORM: u8 = 0x1F;

/// Continuation bit of a base-128 tag number digit
const NOT_LAST_TAG_OCTET_FLAG: u8 = 1u8 << 7;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
/// Class of a DER tag.
pub enum Class {
    Universal = 0b00,
    Application = 0b01,
    ContextSpecific = 0b10,
    Private = 0b11,
}

impl Class {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Class::Universal,
            0b01 => Class::Application,
            0b10 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

/// Identifier octets of a DER value: class, primitive/constructed form and tag number.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Tag {
    pub class: Class,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    pub const BOOLEAN: Self = Self::universal(0x1);
    pub const INTEGER: Self = Self::universal(0x2);
    pub const BIT_STRING: Self = Self::universal(0x3);
    pub const OCTET_STRING: Self = Self::universal(0x4);
    pub const NULL: Self = Self::universal(0x5);
    pub const OBJECT_IDENTIFIER: Self = Self::universal(0x6);
    pub const ENUMERATED: Self = Self::universal(0xA);
    pub const UTF8_STRING: Self = Self::universal(0xC);
    pub const SEQUENCE: Self = Self::universal(0x10).constructed();
    pub const IA5_STRING: Self = Self::universal(0x16);
    pub const GENERALIZED_TIME: Self = Self::universal(0x18);
    pub const GENERAL_STRING: Self = Self::universal(0x1B);

    pub fn from(class: Class, constructed: bool, number: u32) -> Self {
        Self { class, constructed, number }
    }

    pub const fn universal(number: u32) -> Self {
        Self { class: Class::Universal, constructed: false, number }
    }

    pub const fn application(number: u32) -> Self {
        Self { class: Class::Application, constructed: false, number }
    }

    pub const fn context(number: u32) -> Self {
        Self { class: Class::ContextSpecific, constructed: false, number }
    }

    pub const fn constructed(self) -> Self {
        let Self { class, constructed: _, number } = self;
        Self { class, constructed: true, number }
    }

    pub const fn primitive(self) -> Self {
        let Self { class, constructed: _, number } = self;
        Self { class, constructed: false, number }
    }

    /// `UnexpectedTag` unless `self == expected`.
    pub fn assert_eq(self, expected: Tag) -> Result<Tag> {
        if self == expected {
            Ok(self)
        } else {
            Err(ErrorKind::UnexpectedTag {
                expected: Some(expected),
                actual: self,
            }
            .into())
        }
    }

    /// Number of base-128 digits after the leading identifier octet.
    fn subsequent_octets(self) -> u8 {
        match self.number {
            0..=0x1E => 0,
            0x1F..=0x7F => 1,
            0x80..=0x3FFF => 2,
            0x4000..=0x1F_FFFF => 3,
            0x20_0000..=0xFFF_FFFF => 4,
            _ => 5,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            Class::Universal => write!(f, "[UNIVERSAL {}]", self.number),
            Class::Application => write!(f, "[APPLICATION {}]", self.number),
            Class::ContextSpecific => write!(f, "[{}]", self.number),
            Class::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(class = {:?}, constructed = {}, number = {})", self.class, self.constructed, self.number)
    }
}

impl Encodable for Tag {
    fn encoded_len(&self) -> Result<Length> {
        Ok(Length::from(1 + self.subsequent_octets()))
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let first_byte = ((self.class as u8) << CLASS_OFFSET) | ((self.constructed as u8) << CONSTRUCTED_OFFSET);

        let digits = self.subsequent_octets();
        if digits == 0 {
            return encoder.byte(first_byte | self.number as u8);
        }

        encoder.byte(first_byte | HIGH_TAG_NUMBER_FORM)?;
        for i in (0..digits).rev() {
            let digit = ((self.number >> (7 * u32::from(i))) & 0x7F) as u8;
            let flag = if i == 0 { 0 } else { NOT_LAST_TAG_OCTET_FLAG };
            encoder.byte(flag | digit)?;
        }
        Ok(())
    }
}

impl Decodable<'_> for Tag {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let first_byte = decoder.byte()?;
        let class = Class::from_bits(first_byte >> CLASS_OFFSET);
        let constructed = first_byte & CONSTRUCTED_FLAG != 0;

        let number = match first_byte & HIGH_TAG_NUMBER_FORM {
            HIGH_TAG_NUMBER_FORM => {
                let mut number: u32 = 0;
                loop {
                    let byte = decoder.byte()?;
                    if number > (u32::MAX >> 7) {
                        return decoder.error(ErrorKind::Overflow);
                    }
                    number = (number << 7) | u32::from(byte & !NOT_LAST_TAG_OCTET_FLAG);
                    if byte & NOT_LAST_TAG_OCTET_FLAG == 0 {
                        break number;
                    }
                }
            }
            low => u32::from(low),
        };
        Ok(Self { class, constructed, number })
    }
}
