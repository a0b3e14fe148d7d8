//! Kerberos V5 protocol values (RFC 4120, RFC 4121).
//!
//! This module does not talk to a KDC. It recognizes what comes back from one, and it
//! describes the values a client feeds into its own requests.

mod config;
mod error;
pub mod error_codes;
mod etype;
mod gss;
mod key_usage;
mod krb_error;
mod response;

pub use config::{gss_flags, ClientAuthContextConfig, SessionKeySource, GSS_CHECKSUM_TYPE};
pub use error::{KdcClientError, KerberosError, TransportError, TransportErrorKind};
pub use etype::{EncryptionKey, EncryptionType};
pub use gss::{mech, token_id, InitialContextToken};
pub use key_usage::KeyUsage;
pub use krb_error::{KrbError, PaData, PrincipalName};
pub use response::{decode_kdc_response, KdcReply, ReplyKind};

use crate::{ErrorKind, Result, Tag, TaggedValue};

/// Protocol version number carried in every message.
pub const PVNO: i32 = 5;

/// `msg-type` values, which double as the `[APPLICATION n]` tag numbers of the messages.
pub mod msg_type {
    pub const AS_REQ: u32 = 10;
    pub const AS_REP: u32 = 11;
    pub const TGS_REQ: u32 = 12;
    pub const TGS_REP: u32 = 13;
    pub const AP_REQ: u32 = 14;
    pub const AP_REP: u32 = 15;
    pub const KRB_SAFE: u32 = 20;
    pub const KRB_PRIV: u32 = 21;
    pub const KRB_CRED: u32 = 22;
    pub const KRB_ERROR: u32 = 30;
}

/// Name types for [`PrincipalName`].
pub mod name_type {
    pub const NT_UNKNOWN: i32 = 0;
    pub const NT_PRINCIPAL: i32 = 1;
    pub const NT_SRV_INST: i32 = 2;
    pub const NT_SRV_HST: i32 = 3;
    pub const NT_SRV_XHST: i32 = 4;
    pub const NT_UID: i32 = 5;
    pub const NT_X500_PRINCIPAL: i32 = 6;
    pub const NT_SMTP_NAME: i32 = 7;
    pub const NT_ENTERPRISE: i32 = 10;
}

/// The SEQUENCE inside `[APPLICATION number]`.
pub(crate) fn application_body(value: &TaggedValue, number: u32) -> Result<&TaggedValue> {
    let wrapper = Tag::application(number).constructed();
    value.expect(wrapper)?;
    match value.children() {
        [body] => body.expect(Tag::SEQUENCE),
        _ => Err(ErrorKind::Length { tag: wrapper }.into()),
    }
}

/// Read `[number] Int32` and check it against `expected`.
pub(crate) fn expect_int(body: &TaggedValue, number: u32, expected: i32) -> Result<()> {
    if body.child_i32(number)? == expected {
        Ok(())
    } else {
        Err(ErrorKind::Value { tag: Tag::INTEGER }.into())
    }
}
