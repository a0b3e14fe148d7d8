use core::convert::TryInto;
use crate::{Decodable, ErrorKind, Length, Result};

/// Cursor over untrusted DER input.
///
/// The first error poisons the decoder: `bytes` is dropped and every later read fails with
/// [`ErrorKind::Failed`].
#[derive(Debug)]
pub struct Decoder<'a> {
    bytes: Option<&'a [u8]>,

    /// Bytes consumed from `bytes`.
    position: Length,

    /// Absolute offset of `bytes[0]` within the outermost buffer.
    offset: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_offset(bytes, 0)
    }

    /// Decoder for a slice found `offset` bytes into an enclosing message; error positions
    /// and [`Decoder::absolute_position`] count from the start of that message.
    pub fn with_offset(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes: Some(bytes),
            position: Length::zero(),
            offset,
        }
    }

    /// Read one `T`; on failure the error is pinned to where `T` started unless it already
    /// carries a position.
    pub fn decode<T: Decodable<'a>>(&mut self) -> Result<T> {
        if self.is_failed() {
            self.error(ErrorKind::Failed)?;
        }

        let position = self.absolute_length();
        T::decode(self).map_err(|e| {
            self.bytes.take();
            e.or_position(position)
        })
    }

    /// Poison the decoder and report `kind` at the cursor.
    pub fn error<T>(&mut self, kind: ErrorKind) -> Result<T> {
        self.bytes.take();
        Err(kind.at(self.absolute_length()))
    }

    pub fn is_failed(&self) -> bool {
        self.bytes.is_none()
    }

    /// Hand back `value` if the input was consumed exactly.
    pub fn finish<T>(self, value: T) -> Result<T> {
        if self.is_failed() {
            Err(ErrorKind::Failed.at(self.absolute_length()))
        } else if !self.is_finished() {
            Err(ErrorKind::TrailingData {
                decoded: self.position,
                remaining: self.remaining_len()?,
            }
            .at(self.absolute_length()))
        } else {
            Ok(value)
        }
    }

    /// `false` while input remains, and after any error.
    pub fn is_finished(&self) -> bool {
        self.remaining().map(|rem| rem.is_empty()).unwrap_or(false)
    }

    /// Offset of the cursor within the outermost buffer.
    pub fn absolute_position(&self) -> usize {
        self.offset + self.position.to_usize()
    }

    fn absolute_length(&self) -> Length {
        self.absolute_position().try_into().unwrap_or(self.position)
    }

    pub(crate) fn byte(&mut self) -> Result<u8> {
        match self.bytes(1u8)? {
            [byte] => Ok(*byte),
            _ => self.error(ErrorKind::Truncated),
        }
    }

    /// Take the next `len` bytes; `Truncated` if fewer remain.
    pub(crate) fn bytes(&mut self, len: impl TryInto<Length>) -> Result<&'a [u8]> {
        if self.is_failed() {
            self.error(ErrorKind::Failed)?;
        }

        let len = len
            .try_into()
            .or_else(|_| self.error(ErrorKind::Overflow))?;

        let result = match self.remaining()?.get(..len.to_usize()) {
            Some(result) => result,
            None => return self.error(ErrorKind::Truncated),
        };

        self.position = (self.position + len)?;
        Ok(result)
    }

    /// Take every byte left in this decoder.
    pub(crate) fn rest(&mut self) -> Result<&'a [u8]> {
        let len = self.remaining_len()?;
        self.bytes(len)
    }

    fn remaining(&self) -> Result<&'a [u8]> {
        self.bytes
            .and_then(|b| b.get(self.position.to_usize()..))
            .ok_or_else(|| ErrorKind::Truncated.at(self.absolute_length()))
    }

    fn remaining_len(&self) -> Result<Length> {
        self.remaining()?.len().try_into()
    }
}
