use super::{application_body, error_codes, expect_int, msg_type, PVNO};
use crate::{parse, ErrorKind, Result, Tag, TaggedValue};
use alloc::{string::String, vec::Vec};
use core::fmt;

/// `PrincipalName ::= SEQUENCE { name-type [0] Int32, name-string [1] SEQUENCE OF KerberosString }`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PrincipalName {
    pub name_type: i32,
    pub name_string: Vec<String>,
}

impl PrincipalName {
    pub fn new(name_type: i32, name_string: Vec<String>) -> Self {
        Self { name_type, name_string }
    }

    pub fn from_tagged(value: &TaggedValue) -> Result<Self> {
        value.expect(Tag::SEQUENCE)?;
        Ok(Self {
            name_type: value.child_i32(0)?,
            name_string: value.sequence_of(1, |name| name.as_general_string().map(String::from))?,
        })
    }

    pub fn to_tagged(&self) -> TaggedValue {
        let names = self.name_string.iter().map(|name| TaggedValue::general_string(name)).collect();
        TaggedValue::sequence(alloc::vec![
            TaggedValue::explicit(0, TaggedValue::integer(i64::from(self.name_type))),
            TaggedValue::explicit(1, TaggedValue::sequence(names)),
        ])
    }
}

impl fmt::Display for PrincipalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.name_string.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// `PA-DATA ::= SEQUENCE { padata-type [1] Int32, padata-value [2] OCTET STRING }`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaData {
    pub padata_type: i32,
    pub padata_value: Vec<u8>,
}

impl PaData {
    pub fn from_tagged(value: &TaggedValue) -> Result<Self> {
        value.expect(Tag::SEQUENCE)?;
        Ok(Self {
            padata_type: value.child_i32(1)?,
            padata_value: value.child_octet_string(2)?.to_vec(),
        })
    }

    pub fn to_tagged(&self) -> TaggedValue {
        TaggedValue::sequence(alloc::vec![
            TaggedValue::explicit(1, TaggedValue::integer(i64::from(self.padata_type))),
            TaggedValue::explicit(2, TaggedValue::octet_string(self.padata_value.as_slice())),
        ])
    }
}

/// KRB-ERROR (RFC 4120 §5.9.1).
///
/// ```text
/// KRB-ERROR ::= [APPLICATION 30] SEQUENCE {
///         pvno            [0] INTEGER (5),
///         msg-type        [1] INTEGER (30),
///         ctime           [2] KerberosTime OPTIONAL,
///         cusec           [3] Microseconds OPTIONAL,
///         stime           [4] KerberosTime,
///         susec           [5] Microseconds,
///         error-code      [6] Int32,
///         crealm          [7] Realm OPTIONAL,
///         cname           [8] PrincipalName OPTIONAL,
///         realm           [9] Realm -- service realm --,
///         sname           [10] PrincipalName -- service name --,
///         e-text          [11] KerberosString OPTIONAL,
///         e-data          [12] OCTET STRING OPTIONAL
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KrbError {
    pub ctime: Option<String>,
    pub cusec: Option<i32>,
    pub stime: String,
    pub susec: i32,
    pub error_code: i32,
    pub crealm: Option<String>,
    pub cname: Option<PrincipalName>,
    pub realm: String,
    pub sname: PrincipalName,
    pub e_text: Option<String>,
    pub e_data: Option<Vec<u8>>,
}

impl KrbError {
    /// Decode from the `[APPLICATION 30]` value.
    pub fn from_tagged(value: &TaggedValue) -> Result<Self> {
        let body = application_body(value, msg_type::KRB_ERROR)?;
        expect_int(body, 0, PVNO)?;
        expect_int(body, 1, msg_type::KRB_ERROR as i32)?;

        let string = |value: &TaggedValue| value.as_general_string().map(String::from);
        Ok(Self {
            ctime: body.optional_child(2)?.map(|t| t.as_generalized_time().map(String::from)).transpose()?,
            cusec: body.optional_child(3)?.map(TaggedValue::as_i32).transpose()?,
            stime: body.child_generalized_time(4)?.into(),
            susec: body.child_i32(5)?,
            error_code: body.child_i32(6)?,
            crealm: body.optional_child(7)?.map(string).transpose()?,
            cname: body.optional_child(8)?.map(PrincipalName::from_tagged).transpose()?,
            realm: body.child_general_string(9)?.into(),
            sname: PrincipalName::from_tagged(body.child(10)?)?,
            e_text: body.optional_child(11)?.map(string).transpose()?,
            e_data: body.optional_child(12)?.map(|d| d.as_octet_string().map(<[u8]>::to_vec)).transpose()?,
        })
    }

    pub fn to_tagged(&self) -> Result<TaggedValue> {
        let mut fields = alloc::vec![
            TaggedValue::explicit(0, TaggedValue::integer(i64::from(PVNO))),
            TaggedValue::explicit(1, TaggedValue::integer(i64::from(msg_type::KRB_ERROR))),
        ];
        if let Some(ctime) = &self.ctime {
            fields.push(TaggedValue::explicit(2, TaggedValue::generalized_time(ctime)?));
        }
        if let Some(cusec) = self.cusec {
            fields.push(TaggedValue::explicit(3, TaggedValue::integer(i64::from(cusec))));
        }
        fields.push(TaggedValue::explicit(4, TaggedValue::generalized_time(&self.stime)?));
        fields.push(TaggedValue::explicit(5, TaggedValue::integer(i64::from(self.susec))));
        fields.push(TaggedValue::explicit(6, TaggedValue::integer(i64::from(self.error_code))));
        if let Some(crealm) = &self.crealm {
            fields.push(TaggedValue::explicit(7, TaggedValue::general_string(crealm)));
        }
        if let Some(cname) = &self.cname {
            fields.push(TaggedValue::explicit(8, cname.to_tagged()));
        }
        fields.push(TaggedValue::explicit(9, TaggedValue::general_string(&self.realm)));
        fields.push(TaggedValue::explicit(10, self.sname.to_tagged()));
        if let Some(e_text) = &self.e_text {
            fields.push(TaggedValue::explicit(11, TaggedValue::general_string(e_text)));
        }
        if let Some(e_data) = &self.e_data {
            fields.push(TaggedValue::explicit(12, TaggedValue::octet_string(e_data.as_slice())));
        }
        Ok(TaggedValue::application(msg_type::KRB_ERROR, TaggedValue::sequence(fields)))
    }

    /// Symbolic name of `error_code`, if known.
    pub fn error_name(&self) -> Option<&'static str> {
        error_codes::name(self.error_code)
    }

    /// `e-data` read as METHOD-DATA, the hint list a KDC sends with
    /// `KDC_ERR_PREAUTH_REQUIRED`. Absent `e-data` yields an empty list.
    pub fn method_data(&self) -> Result<Vec<PaData>> {
        let e_data = match &self.e_data {
            Some(e_data) => e_data,
            None => return Ok(Vec::new()),
        };
        match parse(e_data)?.as_slice() {
            [sequence] => sequence.elements(PaData::from_tagged),
            _ => Err(ErrorKind::Value { tag: Tag::OCTET_STRING }.into()),
        }
    }
}

impl fmt::Display for KrbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KRB-ERROR {}", self.error_code)?;
        if let Some(name) = self.error_name() {
            write!(f, " ({})", name)?;
        }
        if let Some(e_text) = &self.e_text {
            write!(f, ": {}", e_text)?;
        }
        Ok(())
    }
}
