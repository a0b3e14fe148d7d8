//! # krbder
//!
//! Decoding of the ASN.1 DER subset used by Kerberos V5 ([RFC 4120]), and the protocol values
//! layered on top of it.
//!
//! From X.690 (08/2015):
//! ### 8.1.1 Structure of an encoding
//! The encoding of a data value shall consist of four components which shall appear in the
//! following order: identifier octets, length octets, contents octets, end-of-contents octets.
//! - The identifier octets encode the class (bits 8-7), the primitive/constructed form (bit 6)
//!   and the tag number (bits 5-1). Tag numbers of 31 and above use the high-tag-number form:
//!   bits 5-1 are all set and the number follows as base-128 digits, bit 8 marking continuation.
//! - DER always uses the definite form of length octets: a single byte below 128, otherwise
//!   `0x80 | n` followed by `n` big-endian length bytes.
//! - A constructed encoding carries a series of nested encodings as its contents.
//!
//! The wire bytes come from a KDC or network peer and are not trusted: every header is bounds
//! checked, nesting depth is limited (see [`ParseLimits`]), and the first structural violation
//! aborts decoding.
//!
//! ## Layers
//! - [`parse`] turns bytes into a tree of [`TaggedValue`]s which can be encoded back
//!   byte-for-byte.
//! - Typed accessors on [`TaggedValue`] read BOOLEAN, INTEGER, BIT STRING, OCTET STRING,
//!   OBJECT IDENTIFIER, the character strings and KerberosTime, with explicit context tags
//!   unwrapped through the `child_*` variants.
//! - [`krb`] holds the Kerberos values: key usages, encryption types, the client auth context
//!   configuration and KRB-ERROR recognition.
//! - [`credentials`] holds client credential material and its wire serializations.
//!
//! [RFC 4120]: https://datatracker.ietf.org/doc/html/rfc4120

#![no_std]
#![forbid(unsafe_code)]
// #![warn(missing_docs, rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

delog::generate_macros!();

mod accessors;
mod bit_string;
mod decoder;
mod encoder;
mod error;
mod header;
mod integer;
mod length;
mod oid;
mod tag;
mod tagged_slice;
mod tagged_value;
mod traits;

pub mod credentials;
pub mod krb;

pub use bit_string::BitString;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, ErrorKind, Result};
pub(crate) use header::Header;
pub use integer::Integer;
pub use length::Length;
pub use oid::{decode_oid, encode_oid};
pub use tag::{Class, Tag};
pub use tagged_slice::TaggedSlice;
pub use tagged_value::{parse, parse_with_limits, ParseLimits, TaggedValue};
pub use traits::{Decodable, Encodable};
