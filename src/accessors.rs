//! Typed reads and builders on top of [`TaggedValue`].
//!
//! Every read checks the tag first and fails with [`ErrorKind::UnexpectedTag`] on a mismatch.
//! The `child_*` variants unwrap one explicit context tag, as used by the `[n]` fields of the
//! Kerberos SEQUENCE types.

use crate::{
    bit_string::BitString, integer, oid, Error, ErrorKind, Integer, Length, Result, Tag,
    TaggedValue,
};
use alloc::{string::String, vec::Vec};
use core::str;

fn unexpected(expected: Tag, actual: Tag) -> Error {
    ErrorKind::UnexpectedTag { expected: Some(expected), actual }.into()
}

fn utf8(tag: Tag, bytes: &[u8]) -> Result<&str> {
    str::from_utf8(bytes).map_err(|_| ErrorKind::Value { tag }.into())
}

impl TaggedValue {
    /// Check class, form and number against `tag`.
    pub fn expect(&self, tag: Tag) -> Result<&Self> {
        if self.tag() == tag {
            Ok(self)
        } else {
            Err(unexpected(tag, self.tag()).or_position(self.position()))
        }
    }

    fn expect_data(&self, tag: Tag) -> Result<&[u8]> {
        self.expect(tag).map(TaggedValue::data)
    }

    fn position(&self) -> Length {
        Length::try_from(self.tag_offset()).unwrap_or_default()
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.expect_data(Tag::BOOLEAN)? {
            [byte] => Ok(*byte != 0),
            _ => Err(ErrorKind::Length { tag: Tag::BOOLEAN }.at(self.position())),
        }
    }

    pub fn as_integer(&self) -> Result<Integer<'_>> {
        Integer::new(Tag::INTEGER, self.expect_data(Tag::INTEGER)?)
            .map_err(|e| e.or_position(self.position()))
    }

    pub fn as_enumerated(&self) -> Result<Integer<'_>> {
        Integer::new(Tag::ENUMERATED, self.expect_data(Tag::ENUMERATED)?)
            .map_err(|e| e.or_position(self.position()))
    }

    /// INTEGER read as a Kerberos `Int32`; values outside `i32` are `Overflow`.
    ///
    /// Use [`Integer::to_i32`] through [`TaggedValue::as_integer`] for the truncating read.
    pub fn as_i32(&self) -> Result<i32> {
        i32::try_from(self.as_integer()?).map_err(|e| e.or_position(self.position()))
    }

    pub fn as_bit_string(&self) -> Result<BitString> {
        BitString::from_der(self.expect_data(Tag::BIT_STRING)?)
            .map_err(|e| e.or_position(self.position()))
    }

    pub fn as_octet_string(&self) -> Result<&[u8]> {
        self.expect_data(Tag::OCTET_STRING)
    }

    pub fn as_object_identifier(&self) -> Result<String> {
        oid::decode_oid(self.expect_data(Tag::OBJECT_IDENTIFIER)?)
            .map_err(|e| e.or_position(self.position()))
    }

    /// GeneralString. Kerberos peers put UTF-8 in these, so that is what is accepted.
    pub fn as_general_string(&self) -> Result<&str> {
        utf8(Tag::GENERAL_STRING, self.expect_data(Tag::GENERAL_STRING)?)
            .map_err(|e| e.or_position(self.position()))
    }

    pub fn as_ia5_string(&self) -> Result<&str> {
        let bytes = self.expect_data(Tag::IA5_STRING)?;
        if !bytes.is_ascii() {
            return Err(ErrorKind::Value { tag: Tag::IA5_STRING }.at(self.position()));
        }
        utf8(Tag::IA5_STRING, bytes).map_err(|e| e.or_position(self.position()))
    }

    pub fn as_utf8_string(&self) -> Result<&str> {
        utf8(Tag::UTF8_STRING, self.expect_data(Tag::UTF8_STRING)?)
            .map_err(|e| e.or_position(self.position()))
    }

    /// GeneralizedTime in its textual form, e.g. `"20240131235959Z"`. Not normalized.
    pub fn as_generalized_time(&self) -> Result<&str> {
        let bytes = self.expect_data(Tag::GENERALIZED_TIME)?;
        if !bytes.is_ascii() {
            return Err(ErrorKind::Value { tag: Tag::GENERALIZED_TIME }.at(self.position()));
        }
        utf8(Tag::GENERALIZED_TIME, bytes).map_err(|e| e.or_position(self.position()))
    }

    /// Map `decode` over the elements of this SEQUENCE, in encoding order.
    pub fn elements<T, F>(&self, decode: F) -> Result<Vec<T>>
    where
        F: FnMut(&TaggedValue) -> Result<T>,
    {
        self.expect(Tag::SEQUENCE)?.children().iter().map(decode).collect()
    }

    /// The value inside the explicit tag `[number]`, if this constructed value has one.
    ///
    /// A present `[number]` that is primitive or does not hold exactly one value is malformed.
    pub fn optional_child(&self, number: u32) -> Result<Option<&TaggedValue>> {
        let wanted = Tag::context(number).constructed();
        let wrapper = self
            .children()
            .iter()
            .find(|child| child.tag().class == wanted.class && child.tag().number == number);
        let wrapper = match wrapper {
            Some(wrapper) => wrapper,
            None => return Ok(None),
        };
        wrapper.expect(wanted)?;
        match wrapper.children() {
            [inner] => Ok(Some(inner)),
            _ => Err(ErrorKind::Length { tag: wanted }.at(wrapper.position())),
        }
    }

    /// The value inside the required explicit tag `[number]`.
    pub fn child(&self, number: u32) -> Result<&TaggedValue> {
        self.optional_child(number)?.ok_or_else(|| {
            ErrorKind::MissingField { tag: Tag::context(number).constructed() }.at(self.position())
        })
    }

    pub fn child_bool(&self, number: u32) -> Result<bool> {
        self.child(number)?.as_bool()
    }

    pub fn child_integer(&self, number: u32) -> Result<Integer<'_>> {
        self.child(number)?.as_integer()
    }

    pub fn child_i32(&self, number: u32) -> Result<i32> {
        self.child(number)?.as_i32()
    }

    pub fn child_bit_string(&self, number: u32) -> Result<BitString> {
        self.child(number)?.as_bit_string()
    }

    pub fn child_octet_string(&self, number: u32) -> Result<&[u8]> {
        self.child(number)?.as_octet_string()
    }

    pub fn child_object_identifier(&self, number: u32) -> Result<String> {
        self.child(number)?.as_object_identifier()
    }

    pub fn child_general_string(&self, number: u32) -> Result<&str> {
        self.child(number)?.as_general_string()
    }

    pub fn child_generalized_time(&self, number: u32) -> Result<&str> {
        self.child(number)?.as_generalized_time()
    }

    /// Map `decode` over the SEQUENCE inside `[number]`.
    ///
    /// An absent `[number]`, or one that does not hold a SEQUENCE, yields an empty list: this
    /// is how OPTIONAL `SEQUENCE OF` fields read. A `[number]` that is itself malformed
    /// (primitive, or not holding exactly one value) is still an error, as in
    /// [`TaggedValue::optional_child`].
    pub fn sequence_of<T, F>(&self, number: u32, decode: F) -> Result<Vec<T>>
    where
        F: FnMut(&TaggedValue) -> Result<T>,
    {
        match self.optional_child(number)? {
            Some(inner) if inner.tag() == Tag::SEQUENCE => inner.elements(decode),
            _ => Ok(Vec::new()),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::primitive(Tag::BOOLEAN, alloc::vec![if value { 0xFF } else { 0x00 }])
    }

    pub fn integer(value: i64) -> Self {
        Self::primitive(Tag::INTEGER, integer::encode_i64(value))
    }

    pub fn unsigned(value: u32) -> Self {
        Self::primitive(Tag::INTEGER, integer::encode_u32(value))
    }

    pub fn enumerated(value: i64) -> Self {
        Self::primitive(Tag::ENUMERATED, integer::encode_i64(value))
    }

    pub fn bit_string(bits: &BitString) -> Self {
        Self::primitive(Tag::BIT_STRING, bits.to_der())
    }

    pub fn octet_string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::primitive(Tag::OCTET_STRING, bytes)
    }

    pub fn object_identifier(text: &str) -> Result<Self> {
        let contents = oid::encode_oid(text).map_err(|e| e.or_position(Length::zero()))?;
        Ok(Self::primitive(Tag::OBJECT_IDENTIFIER, contents))
    }

    pub fn general_string(text: &str) -> Self {
        Self::primitive(Tag::GENERAL_STRING, text.as_bytes())
    }

    /// Built values sit at offset 0, so that is where a rejected `text` is reported.
    pub fn ia5_string(text: &str) -> Result<Self> {
        if !text.is_ascii() {
            return Err(ErrorKind::Value { tag: Tag::IA5_STRING }.at(Length::zero()));
        }
        Ok(Self::primitive(Tag::IA5_STRING, text.as_bytes()))
    }

    pub fn utf8_string(text: &str) -> Self {
        Self::primitive(Tag::UTF8_STRING, text.as_bytes())
    }

    pub fn generalized_time(text: &str) -> Result<Self> {
        if !text.is_ascii() {
            return Err(ErrorKind::Value { tag: Tag::GENERALIZED_TIME }.at(Length::zero()));
        }
        Ok(Self::primitive(Tag::GENERALIZED_TIME, text.as_bytes()))
    }

    pub fn sequence(elements: Vec<TaggedValue>) -> Self {
        Self::constructed(Tag::SEQUENCE, elements)
    }

    /// Wrap `inner` in the explicit context tag `[number]`.
    pub fn explicit(number: u32, inner: TaggedValue) -> Self {
        Self::constructed(Tag::context(number), alloc::vec![inner])
    }

    /// Wrap `inner` in `[APPLICATION number]`, as the Kerberos message types do.
    pub fn application(number: u32, inner: TaggedValue) -> Self {
        Self::constructed(Tag::application(number), alloc::vec![inner])
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, BitString, Encodable, ErrorKind, Length, Tag, TaggedValue};
    use alloc::vec;
    use alloc::vec::Vec;
    use hex_literal::hex;

    fn single(bytes: &[u8]) -> TaggedValue {
        let mut values = parse(bytes).unwrap();
        assert_eq!(values.len(), 1);
        values.remove(0)
    }

    #[test]
    fn booleans() {
        assert!(single(&hex!("01 01 FF")).as_bool().unwrap());
        assert!(single(&hex!("01 01 01")).as_bool().unwrap());
        assert!(!single(&hex!("01 01 00")).as_bool().unwrap());
        assert_eq!(
            single(&hex!("01 02 00 00")).as_bool().unwrap_err().kind(),
            ErrorKind::Length { tag: Tag::BOOLEAN }
        );
        assert_eq!(
            single(&hex!("02 01 00")).as_bool().unwrap_err().kind(),
            ErrorKind::UnexpectedTag { expected: Some(Tag::BOOLEAN), actual: Tag::INTEGER }
        );
    }

    #[test]
    fn no_coercion_between_tags() {
        let octets = single(&hex!("04 01 05"));
        assert!(octets.as_integer().is_err());
        assert!(octets.as_general_string().is_err());

        let enumerated = single(&hex!("0A 01 02"));
        assert!(enumerated.as_integer().is_err());
        assert_eq!(enumerated.as_enumerated().unwrap().to_i64(), 2);

        // constructed OCTET STRING is BER, not DER
        let constructed = single(&hex!("24 03 04 01 05"));
        assert!(constructed.as_octet_string().is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(single(&hex!("02 01 05")).as_i32().unwrap(), 5);
        assert_eq!(single(&hex!("02 02 FF 7F")).as_i32().unwrap(), -129);
        assert_eq!(
            single(&hex!("02 00")).as_integer().unwrap_err().kind(),
            ErrorKind::Length { tag: Tag::INTEGER }
        );
    }

    #[test]
    fn strings_and_time() {
        assert_eq!(single(&hex!("1B 03 6B 72 62")).as_general_string().unwrap(), "krb");
        assert_eq!(single(&hex!("16 02 68 69")).as_ia5_string().unwrap(), "hi");
        assert_eq!(
            single(&hex!("16 01 C3")).as_ia5_string().unwrap_err().kind(),
            ErrorKind::Value { tag: Tag::IA5_STRING }
        );
        assert_eq!(single(&hex!("0C 02 C3 A9")).as_utf8_string().unwrap(), "\u{e9}");
        assert_eq!(
            single(&hex!("0C 01 FF")).as_utf8_string().unwrap_err().kind(),
            ErrorKind::Value { tag: Tag::UTF8_STRING }
        );

        let time = TaggedValue::generalized_time("20240131235959Z").unwrap();
        let time = single(&time.to_vec().unwrap());
        assert_eq!(time.as_generalized_time().unwrap(), "20240131235959Z");
    }

    #[test]
    fn object_identifiers() {
        let value = single(&hex!("06 09 2A 86 48 86 F7 12 01 02 02"));
        assert_eq!(value.as_object_identifier().unwrap(), "1.2.840.113554.1.2.2");
    }

    #[test]
    fn bit_strings() {
        let value = single(&hex!("03 05 00 40 81 00 00"));
        assert_eq!(value.as_bit_string().unwrap().to_flags_u32(), 0x4081_0000);
        assert!(single(&hex!("03 02 09 00")).as_bit_string().is_err());
    }

    fn principal() -> TaggedValue {
        // PrincipalName ::= SEQUENCE { name-type [0] Int32, name-string [1] SEQUENCE OF KerberosString }
        TaggedValue::sequence(vec![
            TaggedValue::explicit(0, TaggedValue::integer(2)),
            TaggedValue::explicit(
                1,
                TaggedValue::sequence(vec![
                    TaggedValue::general_string("krbtgt"),
                    TaggedValue::general_string("EXAMPLE.COM"),
                ]),
            ),
        ])
    }

    #[test]
    fn children_and_sequences() {
        let encoded = principal().to_vec().unwrap();
        let value = single(&encoded);

        assert_eq!(value.child_i32(0).unwrap(), 2);
        let names = value
            .sequence_of(1, |name| name.as_general_string().map(alloc::string::String::from))
            .unwrap();
        assert_eq!(names, ["krbtgt", "EXAMPLE.COM"]);

        assert!(value.optional_child(5).unwrap().is_none());
        assert_eq!(
            value.child(5).unwrap_err().kind(),
            ErrorKind::MissingField { tag: Tag::context(5).constructed() }
        );
        assert!(value.sequence_of(5, |v| v.as_i32()).unwrap().is_empty());
        // [0] holds an INTEGER, not a SEQUENCE
        assert!(value.sequence_of(0, |v| v.as_i32()).unwrap().is_empty());
    }

    #[test]
    fn element_errors_propagate() {
        let value = single(&principal().to_vec().unwrap());
        let err = value.sequence_of(1, |name| name.as_i32()).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::UnexpectedTag { expected: Some(Tag::INTEGER), actual: Tag::GENERAL_STRING }
        );
        // the first name-string starts after the 2+5+2+2 header bytes
        assert_eq!(usize::from(err.position().unwrap()), 11);
    }

    #[test]
    fn malformed_explicit_tags() {
        // [0] holding two values
        let value = single(&hex!("30 08 A0 06 02 01 01 02 01 02"));
        assert_eq!(
            value.child(0).unwrap_err().kind(),
            ErrorKind::Length { tag: Tag::context(0).constructed() }
        );

        // primitive [0]
        let value = single(&hex!("30 03 80 01 01"));
        assert!(matches!(value.child(0).unwrap_err().kind(), ErrorKind::UnexpectedTag { .. }));
    }

    #[test]
    fn malformed_wrapper_fails_sequence_of() {
        // primitive [1] where a SEQUENCE OF would be wrapped
        let value = single(&hex!("30 03 81 01 00"));
        let err = value.sequence_of(1, |v| v.as_i32()).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::UnexpectedTag {
                expected: Some(Tag::context(1).constructed()),
                actual: Tag::context(1),
            }
        );
        assert_eq!(usize::from(err.position().unwrap()), 2);

        // [1] holding two SEQUENCEs
        let value = single(&hex!("30 06 A1 04 30 00 30 00"));
        assert_eq!(
            value.sequence_of(1, |v| v.as_i32()).unwrap_err().kind(),
            ErrorKind::Length { tag: Tag::context(1).constructed() }
        );
    }

    #[test]
    fn int32_reads_reject_wide_integers() {
        // 0x1_0000_0019 would truncate to 25
        let wide = single(&hex!("02 05 01 00 00 00 19"));
        assert_eq!(wide.as_integer().unwrap().to_i32(), 25);
        let err = wide.as_i32().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(err.position(), Some(Length::zero()));

        assert_eq!(single(&hex!("02 04 80 00 00 00")).as_i32().unwrap(), i32::MIN);
        assert_eq!(
            single(&hex!("02 05 00 FF FF FF FF")).as_i32().unwrap_err().kind(),
            ErrorKind::Overflow
        );

        let wrapped = single(&hex!("30 09 A0 07 02 05 01 00 00 00 19"));
        let err = wrapped.child_i32(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(usize::from(err.position().unwrap()), 4);
    }

    #[test]
    fn string_errors_carry_positions() {
        let value = single(&hex!("30 03 16 01 C3"));
        let err = value.elements(|v| v.as_ia5_string().map(|_| ())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value { tag: Tag::IA5_STRING });
        assert_eq!(err.position(), Some(Length::from(2u8)));

        let value = single(&hex!("30 03 18 01 C3"));
        let err = value.elements(|v| v.as_generalized_time().map(|_| ())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value { tag: Tag::GENERALIZED_TIME });
        assert_eq!(err.position(), Some(Length::from(2u8)));

        assert_eq!(TaggedValue::ia5_string("\u{e9}").unwrap_err().position(), Some(Length::zero()));
        assert_eq!(
            TaggedValue::generalized_time("\u{e9}").unwrap_err().position(),
            Some(Length::zero())
        );
        assert_eq!(TaggedValue::object_identifier("9.1").unwrap_err().position(), Some(Length::zero()));
    }

    #[test]
    fn builders_round_trip() {
        let bits = BitString::from_flags_u32(0x5000_0000);
        let built = TaggedValue::sequence(vec![
            TaggedValue::explicit(0, TaggedValue::boolean(true)),
            TaggedValue::explicit(1, TaggedValue::unsigned(0xDEAD_BEEF)),
            TaggedValue::explicit(2, TaggedValue::bit_string(&bits)),
            TaggedValue::explicit(3, TaggedValue::octet_string(vec![1u8, 2, 3])),
            TaggedValue::explicit(4, TaggedValue::object_identifier("1.3.6.1.5.5.2").unwrap()),
            TaggedValue::explicit(5, TaggedValue::ia5_string("ascii").unwrap()),
            TaggedValue::explicit(6, TaggedValue::utf8_string("\u{e9}t\u{e9}")),
            TaggedValue::explicit(7, TaggedValue::enumerated(-3)),
        ]);
        let encoded = built.to_vec().unwrap();
        let parsed = single(&encoded);

        assert!(parsed.child_bool(0).unwrap());
        assert_eq!(parsed.child_integer(1).unwrap().to_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(parsed.child_bit_string(2).unwrap(), bits);
        assert_eq!(parsed.child_octet_string(3).unwrap(), &[1, 2, 3]);
        assert_eq!(parsed.child_object_identifier(4).unwrap(), "1.3.6.1.5.5.2");
        assert_eq!(parsed.child(5).unwrap().as_ia5_string().unwrap(), "ascii");
        assert_eq!(parsed.child(6).unwrap().as_utf8_string().unwrap(), "\u{e9}t\u{e9}");
        assert_eq!(parsed.child(7).unwrap().as_enumerated().unwrap().to_i64(), -3);
        assert_eq!(parsed.to_vec().unwrap(), encoded);

        let untouched: Vec<u8> = parsed.children().iter().map(|c| c.tag().number as u8).collect();
        assert_eq!(untouched, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn non_ascii_builders_fail() {
        assert!(TaggedValue::ia5_string("\u{e9}").is_err());
        assert!(TaggedValue::generalized_time("2024\u{e9}").is_err());
    }
}
