//! End-to-end scenarios across the codec, the Kerberos values and the credentials.

use core::convert::TryFrom;
use hex_literal::hex;
use krbder::credentials::{CredentialError, Credentials, WireBufferKind};
use krbder::krb::{
    decode_kdc_response, error_codes, mech, token_id, InitialContextToken, KerberosError, KeyUsage, KrbError,
    PrincipalName, TransportError, TransportErrorKind,
};
use krbder::{parse, Encodable, ErrorKind};

/// KRB-ERROR as sent by a KDC asking for pre-authentication, with METHOD-DATA listing
/// PA-ENC-TIMESTAMP (2) and PA-ETYPE-INFO2 (19).
const PREAUTH_REQUIRED: [u8; 125] = hex!(
    "7E 7B 30 79
     A0 03 02 01 05
     A1 03 02 01 1E
     A4 11 18 0F 32 30 32 34 30 31 33 31 32 33 35 39 35 39 5A
     A5 03 02 01 00
     A6 03 02 01 19
     A9 0D 1B 0B 45 58 41 4D 50 4C 45 2E 43 4F 4D
     AA 20 30 1E A0 03 02 01 02 A1 17 30 15 1B 06 6B 72 62 74 67 74 1B 0B 45 58 41 4D 50 4C 45 2E 43 4F 4D
     AC 1F 04 1D 30 1B
     30 09 A1 03 02 01 02 A2 02 04 00
     30 0E A1 03 02 01 13 A2 07 04 05 30 03 30 01 00"
);

#[test]
fn preauth_required_is_a_kdc_error() {
    match decode_kdc_response(&PREAUTH_REQUIRED) {
        Err(KerberosError::Kdc(error)) => {
            assert_eq!(error.error_code, error_codes::KDC_ERR_PREAUTH_REQUIRED);
            assert!(error.is_preauth_required());
            assert_eq!(error.raw, PREAUTH_REQUIRED);
            assert_eq!(error.token.realm, "EXAMPLE.COM");
            assert_eq!(error.token.sname.to_string(), "krbtgt/EXAMPLE.COM");
            assert_eq!(error.token.stime, "20240131235959Z");

            let hints: Vec<i32> = error.token.method_data().unwrap().iter().map(|pa| pa.padata_type).collect();
            assert_eq!(hints, [2, 19]);
        }
        other => panic!("expected a KDC error, got {:?}", other),
    }
}

#[test]
fn preauth_required_inside_gss_frame() {
    let framed = InitialContextToken { mech: mech::KRB5.into(), token_id: token_id::KRB_ERROR, inner: &PREAUTH_REQUIRED }
        .to_vec()
        .unwrap();

    let err = decode_kdc_response(&framed).unwrap_err();
    assert_eq!(err.kdc_error_code(), Some(25));
    match err {
        KerberosError::Kdc(error) => assert_eq!(error.raw, framed),
        other => panic!("expected a KDC error, got {:?}", other),
    }
}

#[test]
fn fixture_matches_the_builder() {
    let decoded = KrbError::from_tagged(&parse(&PREAUTH_REQUIRED).unwrap()[0]).unwrap();
    assert_eq!(decoded.sname, PrincipalName::new(2, vec!["krbtgt".into(), "EXAMPLE.COM".into()]));
    assert_eq!(decoded.to_tagged().unwrap().to_vec().unwrap(), PREAUTH_REQUIRED);
}

#[test]
fn malformed_response_is_not_a_kdc_error() {
    // declared length runs past the end of the buffer
    let err = decode_kdc_response(&PREAUTH_REQUIRED[..64]).unwrap_err();
    match err {
        KerberosError::InvalidFormat(error) => assert_eq!(error.kind(), ErrorKind::Truncated),
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
    assert_eq!(err.kdc_error_code(), None);
}

/// `PREAUTH_REQUIRED` with the three-byte `error-code [6]` at offset 38 swapped for `field`.
fn with_error_code(field: &[u8]) -> Vec<u8> {
    let grown = field.len() - 5;
    let mut token = Vec::from(&PREAUTH_REQUIRED[..38]);
    token.extend_from_slice(field);
    token.extend_from_slice(&PREAUTH_REQUIRED[43..]);
    token[1] += grown as u8;
    token[3] += grown as u8;
    token
}

#[test]
fn wide_error_code_is_malformed() {
    // 0x1_0000_0019 must not be read as KDC_ERR_PREAUTH_REQUIRED (25)
    let token = with_error_code(&hex!("A6 07 02 05 01 00 00 00 19"));
    let err = decode_kdc_response(&token).unwrap_err();
    assert_eq!(err.kdc_error_code(), None);
    match err {
        KerberosError::InvalidFormat(error) => {
            assert_eq!(error.kind(), ErrorKind::Overflow);
            assert_eq!(error.position().map(usize::from), Some(40));
        }
        other => panic!("expected InvalidFormat, got {:?}", other),
    }

    // the same bytes with a four-byte INTEGER still decode
    let token = with_error_code(&hex!("A6 06 02 04 00 00 00 19"));
    assert_eq!(decode_kdc_response(&token).unwrap_err().kdc_error_code(), Some(25));
}

#[test]
fn three_failure_categories_stay_distinct() {
    let kdc = decode_kdc_response(&PREAUTH_REQUIRED).unwrap_err();
    let format = decode_kdc_response(&hex!("30 03 02 01")).unwrap_err();
    let transport = KerberosError::from(TransportError::new(TransportErrorKind::TimedOut, "no answer from kdc"));

    assert!(matches!(kdc, KerberosError::Kdc(_)));
    assert!(matches!(format, KerberosError::InvalidFormat(_)));
    assert!(matches!(transport, KerberosError::Transport(ref e) if e.kind() == TransportErrorKind::TimedOut));
    assert_eq!(
        kdc.to_string(),
        "KDC returned error 25 (KDC_ERR_PREAUTH_REQUIRED: Additional pre-authentication required)"
    );
}

#[test]
fn unknown_package_is_rejected() {
    let credentials = Credentials::new("alice", "EXAMPLE", Some("secret".into()));
    let err = credentials.serialize("rdp").unwrap_err();
    assert_eq!(err, CredentialError::UnsupportedPackage { name: "rdp".into() });
    assert!(matches!(KerberosError::from(err), KerberosError::UnsupportedPackage(_)));
}

#[test]
fn missing_secret_serializes_with_empty_password() {
    let credentials = Credentials::new("alice", "EXAMPLE", None);
    let buffer = credentials.serialize("kerberos").unwrap();
    assert_eq!(buffer.kind(), WireBufferKind::AuthIdentity);

    let bytes = buffer.as_bytes();
    let password_len = u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    assert_eq!(password_len, 0);
    // header plus "alice" and "EXAMPLE" in UTF-16
    assert_eq!(bytes.len(), 28 + 2 * 5 + 2 * 7);
}

#[test]
fn key_usage_gap() {
    for value in 18..=21 {
        assert!(KeyUsage::try_from(value).is_err());
    }
    assert!(KeyUsage::ALL.iter().all(|usage| !(18..=21).contains(&usage.value())));
    assert_eq!(KeyUsage::try_from(22).unwrap(), KeyUsage::AcceptorSeal);
}
