use super::{
    application_body, expect_int, msg_type, token_id, InitialContextToken, KdcClientError, KerberosError, KrbError,
    PVNO,
};
use crate::{parse, Class, ErrorKind, Length, Tag, TaggedValue};
use alloc::string::String;
use core::convert::TryFrom;

/// Successful replies a client can receive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReplyKind {
    AsRep,
    TgsRep,
    ApRep,
}

impl ReplyKind {
    fn from_msg_type(number: u32) -> Option<Self> {
        match number {
            msg_type::AS_REP => Some(ReplyKind::AsRep),
            msg_type::TGS_REP => Some(ReplyKind::TgsRep),
            msg_type::AP_REP => Some(ReplyKind::ApRep),
            _ => None,
        }
    }

    pub fn msg_type(self) -> u32 {
        match self {
            ReplyKind::AsRep => msg_type::AS_REP,
            ReplyKind::TgsRep => msg_type::TGS_REP,
            ReplyKind::ApRep => msg_type::AP_REP,
        }
    }
}

/// A reply that is not an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KdcReply {
    pub kind: ReplyKind,
    /// Mechanism OID of the GSS frame, if the reply came wrapped in one.
    pub mech: Option<String>,
    /// The `[APPLICATION n]` message.
    pub message: TaggedValue,
}

impl KdcReply {
    /// The SEQUENCE inside the application tag.
    pub fn body(&self) -> crate::Result<&TaggedValue> {
        application_body(&self.message, self.kind.msg_type())
    }
}

/// Recognize a message coming back from a KDC or an acceptor.
///
/// `bytes` is either a bare Kerberos message or one wrapped in a GSS-API
/// InitialContextToken. KRB-ERROR becomes [`KerberosError::Kdc`] carrying the decoded error
/// and the original bytes; AS-REP, TGS-REP and AP-REP come back as a [`KdcReply`]. Anything
/// else is [`KerberosError::InvalidFormat`].
pub fn decode_kdc_response(bytes: &[u8]) -> Result<KdcReply, KerberosError> {
    let (mech, frame_token_id, inner) = if bytes.first() == Some(&0x60) {
        let token = InitialContextToken::decode(bytes)?;
        if !token.is_kerberos() {
            debug!("GSS frame for non-Kerberos mechanism {}", token.mech);
            return Err(ErrorKind::Value { tag: Tag::OBJECT_IDENTIFIER }.into());
        }
        (Some(token.mech), Some(token.token_id), token.inner)
    } else {
        (None, None, bytes)
    };

    let message = single_value(inner)?;
    let tag = message.tag();
    if tag.class != Class::Application || !tag.constructed {
        return Err(ErrorKind::UnexpectedTag { expected: None, actual: tag }.into());
    }

    if let Some(id) = frame_token_id {
        let expected = match id {
            token_id::KRB_ERROR => msg_type::KRB_ERROR,
            token_id::AP_REP => msg_type::AP_REP,
            _ => return Err(ErrorKind::Value { tag: Tag::application(0) }.into()),
        };
        if tag.number != expected {
            let expected = Some(Tag::application(expected).constructed());
            return Err(ErrorKind::UnexpectedTag { expected, actual: tag }.into());
        }
    }

    if tag.number == msg_type::KRB_ERROR {
        let token = KrbError::from_tagged(&message)?;
        let error = KdcClientError { error_code: token.error_code, token, raw: bytes.to_vec() };
        warn!("{}", error);
        return Err(error.into());
    }

    let kind = ReplyKind::from_msg_type(tag.number)
        .ok_or(ErrorKind::UnexpectedTag { expected: None, actual: tag })?;
    let body = application_body(&message, tag.number)?;
    expect_int(body, 0, PVNO)?;
    expect_int(body, 1, tag.number as i32)?;

    debug!("recognized {:?} ({} bytes)", kind, bytes.len());
    Ok(KdcReply { kind, mech, message })
}

fn single_value(bytes: &[u8]) -> crate::Result<TaggedValue> {
    let mut values = parse(bytes)?;
    match values.len() {
        0 => Err(ErrorKind::Truncated.into()),
        1 => Ok(values.remove(0)),
        _ => {
            let decoded = values[1].tag_offset();
            Err(ErrorKind::TrailingData {
                decoded: Length::try_from(decoded)?,
                remaining: Length::try_from(bytes.len() - decoded)?,
            }
            .into())
        }
    }
}
