use crate::{decode_oid, encode_oid, Decoder, Encodable, Error, ErrorKind, Header, Result, Tag, TaggedSlice};
use alloc::{string::String, vec::Vec};
use core::convert::TryFrom;

/// Mechanism OIDs that announce Kerberos V5.
pub mod mech {
    pub const KRB5: &str = "1.2.840.113554.1.2.2";
    /// The mistyped OID some Windows versions send.
    pub const MS_KRB5: &str = "1.2.840.48018.1.2.2";
    pub const KRB5_USER_TO_USER: &str = "1.2.840.113554.1.2.2.3";
}

/// Two-byte `TOK_ID` preceding the inner token (RFC 4121 §4.1, RFC 1964 §1.1).
pub mod token_id {
    pub const AP_REQ: [u8; 2] = [0x01, 0x00];
    pub const AP_REP: [u8; 2] = [0x02, 0x00];
    pub const KRB_ERROR: [u8; 2] = [0x03, 0x00];
    pub const TGT_REQ: [u8; 2] = [0x04, 0x00];
    pub const TGT_REP: [u8; 2] = [0x04, 0x01];
}

/// GSS-API framing around a Kerberos message.
///
/// ```text
/// InitialContextToken ::= [APPLICATION 0] IMPLICIT SEQUENCE {
///         thisMech MechType,
///         innerToken ANY DEFINED BY thisMech
/// }
/// ```
///
/// For Kerberos the inner token is a `TOK_ID` followed by the DER message. The `TOK_ID` is
/// not itself DER, so the frame is read with the cursor-level decoder rather than [`crate::parse`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitialContextToken<'a> {
    pub mech: String,
    pub token_id: [u8; 2],
    pub inner: &'a [u8],
}

impl<'a> InitialContextToken<'a> {
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut decoder = Decoder::new(bytes);
        let frame: TaggedSlice<'a> = decoder.decode()?;
        frame.tag().assert_eq(Tag::application(0).constructed())?;

        let token = frame.nested(|decoder| {
            let mech: TaggedSlice<'a> = decoder.decode()?;
            mech.tag().assert_eq(Tag::OBJECT_IDENTIFIER)?;
            let mech = decode_oid(mech.as_bytes())?;
            let token_id = <[u8; 2]>::try_from(decoder.bytes(2u8)?)
                .map_err(|_| Error::from(ErrorKind::Truncated))?;
            let inner = decoder.rest()?;
            Ok(Self { mech, token_id, inner })
        })?;
        decoder.finish(token)
    }

    /// Serialize the frame.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let oid = encode_oid(&self.mech)?;
        let mech = TaggedSlice::new(Tag::OBJECT_IDENTIFIER, &oid)?;

        let mut body = mech.to_vec()?;
        body.extend_from_slice(&self.token_id);
        body.extend_from_slice(self.inner);

        let mut frame = Header::new(Tag::application(0).constructed(), body.len())?.to_vec()?;
        frame.extend_from_slice(&body);
        Ok(frame)
    }

    pub fn is_kerberos(&self) -> bool {
        self.mech == mech::KRB5 || self.mech == mech::MS_KRB5 || self.mech == mech::KRB5_USER_TO_USER
    }
}
