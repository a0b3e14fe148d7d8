use crate::{Error, ErrorKind, Result, Tag, TaggedValue};
use alloc::vec::Vec;
use core::{convert::TryFrom, fmt};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Encryption types (RFC 3961 §8, RFC 3962, RFC 4757).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum EncryptionType {
    DesCbcCrc = 1,
    DesCbcMd5 = 3,
    Aes128CtsHmacSha196 = 17,
    Aes256CtsHmacSha196 = 18,
    Rc4Hmac = 23,
}

impl EncryptionType {
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Key length in bytes.
    pub fn key_size(self) -> usize {
        match self {
            EncryptionType::DesCbcCrc | EncryptionType::DesCbcMd5 => 8,
            EncryptionType::Aes128CtsHmacSha196 | EncryptionType::Rc4Hmac => 16,
            EncryptionType::Aes256CtsHmacSha196 => 32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncryptionType::DesCbcCrc => "des-cbc-crc",
            EncryptionType::DesCbcMd5 => "des-cbc-md5",
            EncryptionType::Aes128CtsHmacSha196 => "aes128-cts-hmac-sha1-96",
            EncryptionType::Aes256CtsHmacSha196 => "aes256-cts-hmac-sha1-96",
            EncryptionType::Rc4Hmac => "rc4-hmac",
        }
    }
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for EncryptionType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(EncryptionType::DesCbcCrc),
            3 => Ok(EncryptionType::DesCbcMd5),
            17 => Ok(EncryptionType::Aes128CtsHmacSha196),
            18 => Ok(EncryptionType::Aes256CtsHmacSha196),
            23 => Ok(EncryptionType::Rc4Hmac),
            _ => Err(ErrorKind::Value { tag: Tag::INTEGER }.into()),
        }
    }
}

/// `EncryptionKey ::= SEQUENCE { keytype [0] Int32, keyvalue [1] OCTET STRING }`
///
/// The key bytes are wiped when the value is dropped. `keytype` is kept as the raw number so
/// keys of etypes this crate has no name for still decode.
#[derive(Clone, Eq, PartialEq)]
pub struct EncryptionKey {
    keytype: i32,
    keyvalue: Zeroizing<Vec<u8>>,
}

impl EncryptionKey {
    pub fn new(keytype: i32, keyvalue: impl Into<Vec<u8>>) -> Self {
        Self {
            keytype,
            keyvalue: Zeroizing::new(keyvalue.into()),
        }
    }

    /// Fresh random key of the right size for `etype`.
    pub fn generate<R: RngCore + CryptoRng>(etype: EncryptionType, rng: &mut R) -> Self {
        let mut keyvalue = Zeroizing::new(alloc::vec![0u8; etype.key_size()]);
        rng.fill_bytes(keyvalue.as_mut_slice());
        Self { keytype: etype.value(), keyvalue }
    }

    pub fn keytype(&self) -> i32 {
        self.keytype
    }

    /// The etype, if it is one this crate knows.
    pub fn etype(&self) -> Option<EncryptionType> {
        EncryptionType::try_from(self.keytype).ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.keyvalue
    }

    pub fn from_tagged(value: &TaggedValue) -> Result<Self> {
        value.expect(Tag::SEQUENCE)?;
        Ok(Self::new(value.child_i32(0)?, value.child_octet_string(1)?))
    }

    /// Build the DER tree. The tree holds a plain copy of the key bytes.
    pub fn to_tagged(&self) -> TaggedValue {
        TaggedValue::sequence(alloc::vec![
            TaggedValue::explicit(0, TaggedValue::integer(i64::from(self.keytype))),
            TaggedValue::explicit(1, TaggedValue::octet_string(self.keyvalue.as_slice())),
        ])
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("keytype", &self.keytype)
            .field("keyvalue", &format_args!("<{} bytes redacted>", self.keyvalue.len()))
            .finish()
    }
}
