//! Error types.

use crate::{Length, Tag};
use core::{convert::Infallible, fmt};

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;

/// A DER value could not be read or written.
///
/// Carries the absolute offset of the failing header when the input was parsed from a
/// message, so a caller can point at the byte that broke.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    position: Option<Length>,
}

impl Error {
    pub fn new(kind: ErrorKind, position: Length) -> Error {
        Error {
            kind,
            position: Some(position),
        }
    }

    pub fn kind(self) -> ErrorKind {
        self.kind
    }

    /// Offset from the start of the message, if known.
    pub fn position(self) -> Option<Length> {
        self.position
    }

    /// Record `position` unless a more precise one is already known.
    pub(crate) fn or_position(self, position: Length) -> Self {
        Self {
            kind: self.kind,
            position: self.position.or(Some(position)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(pos) = self.position {
            write!(f, " (offset {})", pos)?;
        }

        Ok(())
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            position: None,
        }
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Error {
        match never {}
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ErrorKind {}

/// What went wrong while reading or writing DER.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An earlier error poisoned the decoder or encoder.
    Failed,

    /// `0x80`: the BER indefinite length form.
    InvalidLength,

    /// Contents of `tag` have a length its type does not allow.
    Length { tag: Tag },

    /// A required `[n]` field is absent from its SEQUENCE.
    MissingField { tag: Tag },

    /// A number does not fit the integer type it is read into.
    Overflow,

    /// Long form length with more than four length octets, or output past the end of the
    /// encode buffer.
    Overlength,

    /// Constructed values nest deeper than [`ParseLimits::max_depth`](crate::ParseLimits).
    RecursionLimit { max_depth: usize },

    /// Bytes left over after a complete value.
    TrailingData {
        /// Bytes consumed by the value.
        decoded: Length,
        /// Bytes left after it.
        remaining: Length,
    },

    /// Input ended inside a header or before the declared contents length.
    Truncated,

    /// An `Encodable` wrote fewer bytes than its `encoded_len` announced.
    Underlength { expected: Length, actual: Length },

    /// Class, form or number differs from what the reader asked for.
    UnexpectedTag {
        /// `None` when several tags would have been accepted.
        expected: Option<Tag>,
        actual: Tag,
    },

    /// Contents octets that are not a valid encoding for `tag`.
    Value { tag: Tag },
}

impl ErrorKind {
    /// Attach the offset where the error was detected.
    pub fn at(self, position: Length) -> Error {
        Error::new(self, position)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Failed => f.write_str("decoder or encoder already failed"),
            ErrorKind::InvalidLength => f.write_str("indefinite length form"),
            ErrorKind::Length { tag } => write!(f, "bad contents length for {}", tag),
            ErrorKind::MissingField { tag } => write!(f, "required field {} absent", tag),
            ErrorKind::Overflow => f.write_str("number out of range"),
            ErrorKind::Overlength => f.write_str("length exceeds four octets or the output buffer"),
            ErrorKind::RecursionLimit { max_depth } => write!(f, "nested deeper than {} levels", max_depth),
            ErrorKind::TrailingData { decoded, remaining } => {
                write!(f, "{} bytes left after a {} byte value", remaining, decoded)
            }
            ErrorKind::Truncated => f.write_str("input ends early"),
            ErrorKind::Underlength { expected, actual } => {
                write!(f, "wrote {} bytes where {} were announced", actual, expected)
            }
            ErrorKind::UnexpectedTag { expected: Some(expected), actual } => {
                write!(f, "found tag {} where {} was expected", actual, expected)
            }
            ErrorKind::UnexpectedTag { expected: None, actual } => write!(f, "unexpected tag {}", actual),
            ErrorKind::Value { tag } => write!(f, "invalid contents for {}", tag),
        }
    }
}
