use crate::{Encodable, ErrorKind, Header, Length, Result, Tag};
use core::convert::TryInto;

/// DER writer over a caller-provided buffer.
///
/// Like [`Decoder`](crate::Decoder), the first error poisons the encoder: every later call
/// fails with [`ErrorKind::Failed`].
#[derive(Debug)]
pub struct Encoder<'a> {
    /// `None` once an error has occurred.
    bytes: Option<&'a mut [u8]>,

    /// Bytes written so far.
    position: Length,
}

impl<'a> Encoder<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self {
            bytes: Some(bytes),
            position: Length::zero(),
        }
    }

    /// Write `encodable`, recording the start position on any error it raises.
    pub fn encode<T: Encodable>(&mut self, encodable: &T) -> Result<()> {
        if self.is_failed() {
            self.error(ErrorKind::Failed)?;
        }

        let start = self.position;
        encodable.encode(self).map_err(|e| {
            self.bytes.take();
            e.or_position(start)
        })
    }

    /// Poison the encoder and return `kind` at the current position.
    pub fn error<T>(&mut self, kind: ErrorKind) -> Result<T> {
        self.bytes.take();
        Err(kind.at(self.position))
    }

    pub fn is_failed(&self) -> bool {
        self.bytes.is_none()
    }

    /// The written prefix of the buffer.
    pub fn finish(self) -> Result<&'a [u8]> {
        let written = self.position;
        match self.bytes {
            Some(bytes) => bytes.get(..written.to_usize()).ok_or_else(|| ErrorKind::Truncated.at(written)),
            None => Err(ErrorKind::Failed.at(written)),
        }
    }

    /// Identifier and length octets for a value of `length` content bytes.
    pub(crate) fn header(&mut self, tag: Tag, length: Length) -> Result<()> {
        Header { tag, length }.encode(self)
    }

    pub(crate) fn byte(&mut self, byte: u8) -> Result<()> {
        self.bytes(&[byte])
    }

    pub(crate) fn bytes(&mut self, slice: &[u8]) -> Result<()> {
        self.reserve(slice.len())?.copy_from_slice(slice);
        Ok(())
    }

    /// Advance the cursor by `len` and hand out the skipped region.
    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        let len: Length = match len.try_into() {
            Ok(len) => len,
            Err(_) => return self.error(ErrorKind::Overflow),
        };

        let start = self.position;
        let end = match start + len {
            Ok(end) => end,
            Err(e) => return self.error(e.kind()),
        };
        let capacity = match self.bytes.as_ref() {
            Some(bytes) => bytes.len(),
            None => return self.error(ErrorKind::Failed),
        };
        if end.to_usize() > capacity {
            return self.error(ErrorKind::Overlength);
        }

        self.position = end;
        match self.bytes.as_mut().and_then(|bytes| bytes.get_mut(start.to_usize()..end.to_usize())) {
            Some(region) => Ok(region),
            None => Err(ErrorKind::Failed.at(start)),
        }
    }
}
