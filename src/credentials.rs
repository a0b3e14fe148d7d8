//! Client credential material and the wire buffers handed to an authentication package.
//!
//! The secret and every buffer derived from it live in [`Zeroizing`] storage, sized up front
//! so no reallocation leaves a stray copy behind.

use alloc::{string::String, vec::Vec};
use core::{convert::TryFrom, fmt};
use zeroize::Zeroizing;

/// `SEC_WINNT_AUTH_IDENTITY_UNICODE`
pub const AUTH_IDENTITY_UNICODE: u32 = 0x2;
/// `SEC_WINNT_AUTH_IDENTITY_ONLY`: ask for a ticket without group or privilege data.
pub const AUTH_IDENTITY_ONLY: u32 = 0x8;
/// `KerbInteractiveLogon`
pub const KERB_INTERACTIVE_LOGON: u32 = 2;

const AUTH_IDENTITY_HEADER: usize = 7 * 4;
const INTERACTIVE_LOGON_HEADER: usize = 4 + 3 * 8;

const AUTH_IDENTITY_PACKAGES: [&str; 4] = ["ntlm", "negotiate", "kerberos", "wdigest"];
const INTERACTIVE_LOGON_PACKAGES: [&str; 1] = ["credssp"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CredentialError {
    /// No wire layout is known for this package.
    UnsupportedPackage { name: String },
    /// A field is longer than its length slot in the wire layout allows.
    FieldTooLong { field: &'static str },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::UnsupportedPackage { name } => {
                write!(f, "no credential layout for package {:?}", name)
            }
            CredentialError::FieldTooLong { field } => write!(f, "{} too long for credential buffer", field),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CredentialError {}

pub type Result<T> = core::result::Result<T, CredentialError>;

/// A password, wiped when dropped.
///
/// Not `Clone`: the single copy is the one [`Credentials::dispose`] wipes.
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Secret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// The secret as UTF-16LE bytes, zeroed when this handle goes out of scope.
pub struct MaterializedSecret(Zeroizing<Vec<u8>>);

impl MaterializedSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for MaterializedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterializedSecret(<{} bytes redacted>)", self.0.len())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WireBufferKind {
    /// `SEC_WINNT_AUTH_IDENTITY_W`, pointers replaced by offsets from the buffer start.
    AuthIdentity,
    /// `KERB_INTERACTIVE_LOGON`, `UNICODE_STRING` buffers given as offsets.
    InteractiveLogon,
}

/// Serialized credentials. Holds the secret, so it is wiped on drop too.
pub struct WireBuffer {
    kind: WireBufferKind,
    bytes: Zeroizing<Vec<u8>>,
}

impl WireBuffer {
    pub fn kind(&self) -> WireBufferKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for WireBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireBuffer")
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Username, domain and an optional secret for a client logon.
///
/// There is no `Clone`, so no second copy of the secret can outlive [`Credentials::dispose`]:
///
/// ```compile_fail
/// let credentials = krbder::credentials::Credentials::new("alice", "EX", Some("pw".into()));
/// let copy = credentials.clone();
/// ```
#[derive(Default)]
pub struct Credentials {
    pub username: String,
    pub domain: String,
    /// Request an identity-only ticket, see [`AUTH_IDENTITY_ONLY`].
    pub identity_only: bool,
    secret: Option<Secret>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, domain: impl Into<String>, secret: Option<Secret>) -> Self {
        Self {
            username: username.into(),
            domain: domain.into(),
            identity_only: false,
            secret,
        }
    }

    pub fn with_identity_only(mut self, identity_only: bool) -> Self {
        self.identity_only = identity_only;
        self
    }

    /// Replace the secret. The previous one is wiped.
    pub fn set_secret(&mut self, secret: impl Into<Secret>) {
        self.secret = Some(secret.into());
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Wipe the secret now. The credentials stay usable and serialize with an empty secret.
    pub fn dispose(&mut self) {
        self.secret = None;
    }

    /// The secret as UTF-16LE. No secret gives an empty buffer.
    pub fn materialize(&self) -> MaterializedSecret {
        let secret = self.secret_str();
        let mut bytes = Zeroizing::new(Vec::with_capacity(utf16_len(secret) * 2));
        push_utf16(&mut bytes, secret);
        MaterializedSecret(bytes)
    }

    /// Serialize for the authentication package `package_name`, matched ignoring ASCII case.
    pub fn serialize(&self, package_name: &str) -> Result<WireBuffer> {
        let matches = |names: &[&str]| names.iter().any(|name| name.eq_ignore_ascii_case(package_name));

        let buffer = if matches(&AUTH_IDENTITY_PACKAGES) {
            self.auth_identity()?
        } else if matches(&INTERACTIVE_LOGON_PACKAGES) {
            self.interactive_logon()?
        } else {
            warn!("no credential layout for package {:?}", package_name);
            return Err(CredentialError::UnsupportedPackage { name: package_name.into() });
        };
        debug!("serialized credentials for {} as {:?}, {} bytes", package_name, buffer.kind, buffer.len());
        Ok(buffer)
    }

    fn secret_str(&self) -> &str {
        self.secret.as_ref().map_or("", Secret::expose)
    }

    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("username", self.username.as_str()),
            ("domain", self.domain.as_str()),
            ("secret", self.secret_str()),
        ]
    }

    /// Seven little-endian `u32`s (user offset and length, domain offset and length, password
    /// offset and length, flags) followed by the UTF-16LE strings. Lengths count UTF-16 units.
    fn auth_identity(&self) -> Result<WireBuffer> {
        let [user, domain, secret] = self.fields();
        let total = AUTH_IDENTITY_HEADER + 2 * (utf16_len(user.1) + utf16_len(domain.1) + utf16_len(secret.1));
        let mut bytes = Zeroizing::new(Vec::with_capacity(total));

        let mut offset = AUTH_IDENTITY_HEADER;
        for (field, text) in [user, domain, secret] {
            let units = utf16_len(text);
            let too_long = || CredentialError::FieldTooLong { field };
            push_u32(&mut bytes, u32::try_from(offset).map_err(|_| too_long())?);
            push_u32(&mut bytes, u32::try_from(units).map_err(|_| too_long())?);
            offset += 2 * units;
        }

        let mut flags = AUTH_IDENTITY_UNICODE;
        if self.identity_only {
            flags |= AUTH_IDENTITY_ONLY;
        }
        push_u32(&mut bytes, flags);

        for (_, text) in [user, domain, secret] {
            push_utf16(&mut bytes, text);
        }
        Ok(WireBuffer { kind: WireBufferKind::AuthIdentity, bytes })
    }

    /// `MessageType` then three `UNICODE_STRING`s (domain, user, password), each a `u16` byte
    /// length, a `u16` maximum length and a `u32` offset, followed by the UTF-16LE strings.
    fn interactive_logon(&self) -> Result<WireBuffer> {
        let [user, domain, secret] = self.fields();
        let ordered = [domain, user, secret];
        let total = INTERACTIVE_LOGON_HEADER + ordered.iter().map(|(_, text)| 2 * utf16_len(text)).sum::<usize>();
        let mut bytes = Zeroizing::new(Vec::with_capacity(total));

        push_u32(&mut bytes, KERB_INTERACTIVE_LOGON);
        let mut offset = INTERACTIVE_LOGON_HEADER;
        for (field, text) in ordered {
            let len = 2 * utf16_len(text);
            let too_long = || CredentialError::FieldTooLong { field };
            let len16 = u16::try_from(len).map_err(|_| too_long())?;
            push_u16(&mut bytes, len16);
            push_u16(&mut bytes, len16);
            push_u32(&mut bytes, u32::try_from(offset).map_err(|_| too_long())?);
            offset += len;
        }

        for (_, text) in ordered {
            push_utf16(&mut bytes, text);
        }
        Ok(WireBuffer { kind: WireBufferKind::InteractiveLogon, bytes })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("domain", &self.domain)
            .field("identity_only", &self.identity_only)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn push_utf16(out: &mut Vec<u8>, text: &str) {
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use hex_literal::hex;

    fn alice() -> Credentials {
        Credentials::new("alice", "EX", Some("pw".into()))
    }

    fn u32_at(bytes: &[u8], index: usize) -> u32 {
        u32::from_le_bytes([bytes[index], bytes[index + 1], bytes[index + 2], bytes[index + 3]])
    }

    #[test]
    fn materialize_as_utf16le() {
        let secret = alice().materialize();
        assert_eq!(secret.as_bytes(), b"p\0w\0");

        let secret = Credentials::new("bob", "EX", Some("\u{e9}\u{1F600}".into())).materialize();
        assert_eq!(secret.as_bytes(), hex!("E9 00 3D D8 00 DE"));
    }

    #[test]
    fn no_secret_materializes_empty() {
        let credentials = Credentials::new("alice", "EX", None);
        assert!(credentials.materialize().is_empty());
    }

    #[test]
    fn dispose_keeps_credentials_usable() {
        let mut credentials = alice();
        assert!(credentials.has_secret());
        credentials.dispose();
        assert!(!credentials.has_secret());
        assert!(credentials.materialize().is_empty());

        let buffer = credentials.serialize("ntlm").unwrap();
        assert_eq!(u32_at(buffer.as_bytes(), 20), 0);

        credentials.set_secret("again");
        assert_eq!(credentials.materialize().len(), 10);
    }

    #[test]
    fn auth_identity_layout() {
        let buffer = alice().serialize("Kerberos").unwrap();
        assert_eq!(buffer.kind(), WireBufferKind::AuthIdentity);
        let parts: [&[u8]; 4] = [
            &hex!("1C000000 05000000 26000000 02000000 2A000000 02000000 02000000"),
            b"a\0l\0i\0c\0e\0",
            b"E\0X\0",
            b"p\0w\0",
        ];
        let expected = parts.concat();
        assert_eq!(buffer.as_bytes(), &expected[..]);
    }

    #[test]
    fn identity_only_flag() {
        let buffer = alice().with_identity_only(true).serialize("negotiate").unwrap();
        assert_eq!(u32_at(buffer.as_bytes(), 24), AUTH_IDENTITY_UNICODE | AUTH_IDENTITY_ONLY);
    }

    #[test]
    fn interactive_logon_layout() {
        let buffer = alice().serialize("CredSSP").unwrap();
        assert_eq!(buffer.kind(), WireBufferKind::InteractiveLogon);
        let parts: [&[u8]; 4] = [
            &hex!("02000000 0400 0400 1C000000 0A00 0A00 20000000 0400 0400 2A000000"),
            b"E\0X\0",
            b"a\0l\0i\0c\0e\0",
            b"p\0w\0",
        ];
        let expected = parts.concat();
        assert_eq!(buffer.as_bytes(), &expected[..]);
    }

    #[test]
    fn package_names() {
        for name in ["ntlm", "NTLM", "Negotiate", "kerberos", "WDigest"] {
            assert_eq!(alice().serialize(name).unwrap().kind(), WireBufferKind::AuthIdentity);
        }
        assert_eq!(
            alice().serialize("rdp").unwrap_err(),
            CredentialError::UnsupportedPackage { name: "rdp".into() }
        );
        assert!(alice().serialize("").is_err());
        assert!(alice().serialize("kerberos ").is_err());
    }

    #[test]
    fn interactive_logon_length_limit() {
        let long = "x".repeat(40_000);
        let credentials = Credentials::new(long, "EX", None);
        assert_eq!(
            credentials.serialize("credssp").unwrap_err(),
            CredentialError::FieldTooLong { field: "username" }
        );
        assert!(credentials.serialize("ntlm").is_ok());
    }

    #[test]
    fn debug_never_shows_the_secret() {
        let credentials = Credentials::new("alice", "EX", Some("hunter2".into()));
        let shown = format!("{:?}", credentials);
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));

        assert!(format!("{:?}", credentials.materialize()).contains("14 bytes redacted"));
        assert!(!format!("{:?}", credentials.serialize("ntlm").unwrap()).contains("hunter2"));
    }
}
