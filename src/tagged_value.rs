//! Decoded DER trees.

use crate::{Decoder, Encodable, Encoder, ErrorKind, Header, Length, Result, Tag, TaggedSlice};
use alloc::vec::Vec;

/// Bounds applied while parsing untrusted input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseLimits {
    /// Maximum number of constructed values nested inside each other.
    pub max_depth: usize,
}

impl ParseLimits {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self { max_depth: Self::DEFAULT_MAX_DEPTH }
    }
}

/// One decoded DER node.
///
/// A primitive value carries its contents octets, a constructed value carries its decoded
/// children; the other side is always empty. Offsets point into the buffer handed to
/// [`parse`] and are zero for values built in memory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedValue {
    tag: Tag,
    data: Vec<u8>,
    children: Vec<TaggedValue>,
    tag_offset: usize,
    data_offset: usize,
}

/// Parse every top-level value in `bytes`, descending into constructed values.
pub fn parse(bytes: &[u8]) -> Result<Vec<TaggedValue>> {
    parse_with_limits(bytes, ParseLimits::default())
}

/// [`parse`] with explicit bounds.
pub fn parse_with_limits(bytes: &[u8], limits: ParseLimits) -> Result<Vec<TaggedValue>> {
    let mut decoder = Decoder::new(bytes);
    let values = parse_level(&mut decoder, 0, limits).map_err(|e| {
        debug!("DER parse failed: {}", e);
        e
    })?;
    trace!("parsed {} top-level DER values from {} bytes", values.len(), bytes.len());
    Ok(values)
}

fn parse_level(decoder: &mut Decoder<'_>, depth: usize, limits: ParseLimits) -> Result<Vec<TaggedValue>> {
    let mut values = Vec::new();
    while !decoder.is_finished() {
        let slice: TaggedSlice<'_> = decoder.decode()?;
        values.push(TaggedValue::from_slice(slice, depth, limits)?);
    }
    Ok(values)
}

impl TaggedValue {
    fn from_slice(slice: TaggedSlice<'_>, depth: usize, limits: ParseLimits) -> Result<Self> {
        let TaggedSlice { tag, value, tag_offset, value_offset } = slice;

        if !tag.constructed {
            return Ok(Self { tag, data: value.to_vec(), children: Vec::new(), tag_offset, data_offset: value_offset });
        }

        if depth >= limits.max_depth {
            let position = Length::try_from(tag_offset).unwrap_or_default();
            return Err(ErrorKind::RecursionLimit { max_depth: limits.max_depth }.at(position));
        }

        let mut nested = Decoder::with_offset(value, value_offset);
        let children = parse_level(&mut nested, depth + 1, limits)?;
        Ok(Self { tag, data: Vec::new(), children, tag_offset, data_offset: value_offset })
    }

    /// Build a primitive value. The constructed bit of `tag` is cleared.
    pub fn primitive(tag: Tag, data: impl Into<Vec<u8>>) -> Self {
        Self {
            tag: tag.primitive(),
            data: data.into(),
            children: Vec::new(),
            tag_offset: 0,
            data_offset: 0,
        }
    }

    /// Build a constructed value. The constructed bit of `tag` is set.
    pub fn constructed(tag: Tag, children: Vec<TaggedValue>) -> Self {
        Self {
            tag: tag.constructed(),
            data: Vec::new(),
            children,
            tag_offset: 0,
            data_offset: 0,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn is_constructed(&self) -> bool {
        self.tag.constructed
    }

    /// Contents octets of a primitive value; empty for constructed values.
    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decoded children of a constructed value, in encoding order; empty for primitives.
    pub fn children(&self) -> &[TaggedValue] {
        &self.children
    }

    /// Absolute offset of the identifier octet within the parsed buffer.
    pub fn tag_offset(&self) -> usize {
        self.tag_offset
    }

    /// Absolute offset of the first contents octet within the parsed buffer.
    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    /// Length of the contents octets, for primitive and constructed values alike.
    pub fn content_len(&self) -> Result<Length> {
        if self.tag.constructed {
            self.children
                .iter()
                .try_fold(Length::zero(), |sum, child| sum + child.encoded_len()?)
        } else {
            Length::try_from(self.data.len())
        }
    }
}

impl Encodable for TaggedValue {
    fn encoded_len(&self) -> Result<Length> {
        let content_len = self.content_len()?;
        Header { tag: self.tag, length: content_len }.encoded_len()? + content_len
    }

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        encoder.header(self.tag, self.content_len()?)?;
        if self.tag.constructed {
            for child in &self.children {
                child.encode(encoder)?;
            }
            Ok(())
        } else {
            encoder.bytes(&self.data)
        }
    }
}
