use crate::{Error, ErrorKind, Tag};
use core::convert::TryFrom;

/// Key usage numbers (RFC 4120 §7.5.1, RFC 4121 §2, MS-SFU).
///
/// 18 through 21 are not assigned and have no variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum KeyUsage {
    PaEncTimestamp = 1,
    Ticket = 2,
    EncAsRepPart = 3,
    TgsReqAuthDataSessionKey = 4,
    TgsReqAuthDataSubKey = 5,
    PaTgsReqChecksum = 6,
    PaTgsReqAuthenticator = 7,
    EncTgsRepPartSessionKey = 8,
    EncTgsRepPartSubKey = 9,
    AuthenticatorChecksum = 10,
    ApReqAuthenticator = 11,
    EncApRepPart = 12,
    EncKrbPrivPart = 13,
    EncKrbCredPart = 14,
    KrbSafeChecksum = 15,
    OtherEncrypted = 16,
    PaForUserChecksum = 17,
    AcceptorSeal = 22,
    AcceptorSign = 23,
    InitiatorSeal = 24,
    InitiatorSign = 25,
    PaS4uX509User = 26,
}

impl KeyUsage {
    pub const ALL: [KeyUsage; 22] = [
        KeyUsage::PaEncTimestamp,
        KeyUsage::Ticket,
        KeyUsage::EncAsRepPart,
        KeyUsage::TgsReqAuthDataSessionKey,
        KeyUsage::TgsReqAuthDataSubKey,
        KeyUsage::PaTgsReqChecksum,
        KeyUsage::PaTgsReqAuthenticator,
        KeyUsage::EncTgsRepPartSessionKey,
        KeyUsage::EncTgsRepPartSubKey,
        KeyUsage::AuthenticatorChecksum,
        KeyUsage::ApReqAuthenticator,
        KeyUsage::EncApRepPart,
        KeyUsage::EncKrbPrivPart,
        KeyUsage::EncKrbCredPart,
        KeyUsage::KrbSafeChecksum,
        KeyUsage::OtherEncrypted,
        KeyUsage::PaForUserChecksum,
        KeyUsage::AcceptorSeal,
        KeyUsage::AcceptorSign,
        KeyUsage::InitiatorSeal,
        KeyUsage::InitiatorSign,
        KeyUsage::PaS4uX509User,
    ];

    /// The number fed to the key derivation.
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl From<KeyUsage> for i32 {
    fn from(usage: KeyUsage) -> i32 {
        usage.value()
    }
}

impl TryFrom<i32> for KeyUsage {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Error> {
        KeyUsage::ALL
            .iter()
            .copied()
            .find(|usage| usage.value() == value)
            .ok_or_else(|| ErrorKind::Value { tag: Tag::INTEGER }.into())
    }
}
