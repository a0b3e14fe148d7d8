use crate::{Decodable, Decoder, Encodable, Encoder, Header, Length, Result, Tag};
use core::convert::TryFrom;

/// A single DER data object borrowed from the input: tag plus raw contents, not descended into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TaggedSlice<'a> {
    pub(crate) tag: Tag,
    pub(crate) value: &'a [u8],
    pub(crate) tag_offset: usize,
    pub(crate) value_offset: usize,
}

impl<'a> TaggedSlice<'a> {
    /// Create a new tagged slice, checking lengths.
    pub fn new(tag: Tag, value: &'a [u8]) -> Result<Self> {
        Length::try_from(value.len())?;
        Ok(Self { tag, value, tag_offset: 0, value_offset: 0 })
    }

    /// Borrow the inner byte slice.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.value
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Absolute offset of the identifier octet.
    pub fn tag_offset(&self) -> usize {
        self.tag_offset
    }

    /// Absolute offset of the first contents octet.
    pub fn value_offset(&self) -> usize {
        self.value_offset
    }

    /// Get the length of the inner byte slice.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Is the inner byte slice empty?
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get the DER [`Header`] for this [`TaggedSlice`] value
    fn header(self) -> Result<Header> {
        Header::new(self.tag, self.len())
    }

    /// Attempt to decode the contents as nested values, creating a new
    /// nested [`Decoder`] and calling the provided argument with it.
    pub fn nested<F, T>(self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Decoder<'a>) -> Result<T>,
    {
        let mut nested_decoder = Decoder::with_offset(self.value, self.value_offset);
        let result = f(&mut nested_decoder)?;
        nested_decoder.finish(result)
    }
}

impl<'a> Decodable<'a> for TaggedSlice<'a> {
    fn decode(decoder: &mut Decoder<'a>) -> Result<TaggedSlice<'a>> {
        let tag_offset = decoder.absolute_position();
        let header = Header::decode(decoder)?;
        let value_offset = decoder.absolute_position();
        let value = decoder.bytes(header.length)?;
        Ok(Self { tag: header.tag, value, tag_offset, value_offset })
    }
}

impl<'a> Encodable for TaggedSlice<'a> {
    fn encoded_len(&self) -> Result<Length> {
        self.header()?.encoded_len()? + self.len()
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        encoder.header(self.tag, Length::try_from(self.len())?)?;
        encoder.bytes(self.value)
    }
}
