//! `Decodable` and `Encodable`, implemented by the header pieces and by [`TaggedValue`](crate::TaggedValue).

use crate::{Decoder, Encoder, ErrorKind, Length, Result};
use alloc::vec::Vec;
use core::convert::TryInto;

pub trait Decodable<'a>: Sized {
    fn decode(decoder: &mut Decoder<'a>) -> Result<Self>;

    /// Decode exactly one `Self` from `bytes`; leftover input is an error.
    fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes);
        let result = Self::decode(&mut decoder)?;
        decoder.finish(result)
    }
}

pub trait Encodable {
    /// Exact number of bytes [`encode`](Encodable::encode) will write.
    fn encoded_len(&self) -> Result<Length>;

    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()>;

    /// Write into `buf`, returning the written prefix.
    fn encode_to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8]> {
        let mut encoder = Encoder::new(buf);
        self.encode(&mut encoder)?;
        encoder.finish()
    }

    /// Append the encoding to `buf`.
    fn encode_to_vec(&self, buf: &mut Vec<u8>) -> Result<Length> {
        let expected = self.encoded_len()?.to_usize();
        let start = buf.len();
        buf.resize(start + expected, 0);
        encode_exact(self, &mut buf[start..])
    }

    fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_to_vec(&mut buf)?;
        Ok(buf)
    }

    /// Append the encoding to a fixed-capacity `buf`; `Overlength` if it does not fit.
    #[cfg(feature = "heapless")]
    #[cfg_attr(docsrs, doc(cfg(feature = "heapless")))]
    fn encode_to_heapless_vec<const N: usize>(&self, buf: &mut heapless::Vec<u8, N>) -> Result<Length> {
        let expected = self.encoded_len()?.to_usize();
        let start = buf.len();
        buf.resize_default(start + expected)
            .map_err(|_| crate::Error::from(ErrorKind::Overlength))?;
        encode_exact(self, &mut buf[start..])
    }

    #[cfg(feature = "heapless")]
    #[cfg_attr(docsrs, doc(cfg(feature = "heapless")))]
    fn to_heapless_vec<const N: usize>(&self) -> Result<heapless::Vec<u8, N>> {
        let mut buf = heapless::Vec::new();
        self.encode_to_heapless_vec(&mut buf)?;
        Ok(buf)
    }
}

/// Encode into `region`, which was sized from `encoded_len`, and check the whole of it was used.
fn encode_exact<T: Encodable + ?Sized>(value: &T, region: &mut [u8]) -> Result<Length> {
    let expected = region.len();
    let mut encoder = Encoder::new(region);
    value.encode(&mut encoder)?;
    let actual = encoder.finish()?.len();

    if actual != expected {
        return Err(ErrorKind::Underlength {
            expected: expected.try_into()?,
            actual: actual.try_into()?,
        }
        .into());
    }
    actual.try_into()
}

#[cfg(test)]
mod tests {
    use crate::{Encodable, Encoder, ErrorKind, Length, Tag, TaggedValue};

    #[test]
    fn encode_to_vec_appends() {
        let mut buf = alloc::vec![0xAAu8];
        let value = TaggedValue::primitive(Tag::OCTET_STRING, alloc::vec![1u8, 2, 3]);
        let written = value.encode_to_vec(&mut buf).unwrap();
        assert_eq!(written.to_usize(), 5);
        assert_eq!(buf, [0xAA, 0x04, 0x03, 1, 2, 3]);
    }

    #[test]
    fn encode_to_short_slice_fails() {
        let value = TaggedValue::primitive(Tag::OCTET_STRING, alloc::vec![1u8, 2, 3]);
        let mut buf = [0u8; 4];
        assert!(value.encode_to_slice(&mut buf).is_err());
    }

    /// Announces three bytes, writes two.
    struct ShortWriter;

    impl Encodable for ShortWriter {
        fn encoded_len(&self) -> crate::Result<Length> {
            Ok(Length::from(3u8))
        }

        fn encode(&self, encoder: &mut Encoder<'_>) -> crate::Result<()> {
            TaggedValue::primitive(Tag::NULL, alloc::vec::Vec::new()).encode(encoder)
        }
    }

    #[test]
    fn short_write_is_underlength() {
        let err = ShortWriter.to_vec().unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::Underlength {
                expected: Length::from(3u8),
                actual: Length::from(2u8),
            }
        );
    }

    #[cfg(feature = "heapless")]
    #[test]
    fn encode_to_heapless() {
        let value = TaggedValue::boolean(true);
        let encoded: heapless::Vec<u8, 8> = value.to_heapless_vec().unwrap();
        assert_eq!(encoded.as_slice(), &[0x01, 0x01, 0xFF]);

        let too_small: crate::Result<heapless::Vec<u8, 2>> = value.to_heapless_vec();
        assert!(too_small.is_err());
    }
}
