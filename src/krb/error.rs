use super::{error_codes, KrbError};
use crate::credentials::CredentialError;
use alloc::{string::String, vec::Vec};
use core::fmt;

/// A KDC answered with KRB-ERROR.
///
/// This is the remote side refusing the request, not a local decoding failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KdcClientError {
    pub error_code: i32,
    /// The decoded KRB-ERROR.
    pub token: KrbError,
    /// The bytes the KDC sent, GSS framing included if there was any.
    pub raw: Vec<u8>,
}

impl KdcClientError {
    pub fn name(&self) -> Option<&'static str> {
        error_codes::name(self.error_code)
    }

    pub fn is_preauth_required(&self) -> bool {
        self.error_code == error_codes::KDC_ERR_PREAUTH_REQUIRED
    }
}

impl fmt::Display for KdcClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KDC returned error {}", self.error_code)?;
        match (self.name(), error_codes::description(self.error_code)) {
            (Some(name), Some(description)) => write!(f, " ({}: {})", name, description),
            _ => Ok(()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransportErrorKind {
    Unreachable,
    TimedOut,
    Closed,
    Other,
}

/// Failure reported by whatever carried the bytes to and from the KDC.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportError {
    kind: TransportErrorKind,
    description: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, description: impl Into<String>) -> Self {
        Self { kind, description: description.into() }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure ({:?}): {}", self.kind, self.description)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;
        use std::string::ToString;

        let kind = match error.kind() {
            Io::ConnectionRefused | Io::NotConnected | Io::AddrNotAvailable => TransportErrorKind::Unreachable,
            Io::TimedOut | Io::WouldBlock => TransportErrorKind::TimedOut,
            Io::ConnectionReset | Io::ConnectionAborted | Io::BrokenPipe | Io::UnexpectedEof => {
                TransportErrorKind::Closed
            }
            _ => TransportErrorKind::Other,
        };
        Self::new(kind, error.to_string())
    }
}

/// Everything that can go wrong around a Kerberos exchange.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KerberosError {
    /// The bytes were not well-formed DER, or not the expected message.
    InvalidFormat(crate::Error),
    /// The KDC sent KRB-ERROR.
    Kdc(KdcClientError),
    /// Credentials could not be serialized for the requested package.
    UnsupportedPackage(CredentialError),
    Transport(TransportError),
}

impl KerberosError {
    /// The KDC error code, if the KDC is the one that failed.
    pub fn kdc_error_code(&self) -> Option<i32> {
        match self {
            KerberosError::Kdc(error) => Some(error.error_code),
            _ => None,
        }
    }
}

impl fmt::Display for KerberosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KerberosError::InvalidFormat(error) => write!(f, "invalid Kerberos message: {}", error),
            KerberosError::Kdc(error) => fmt::Display::fmt(error, f),
            KerberosError::UnsupportedPackage(error) => fmt::Display::fmt(error, f),
            KerberosError::Transport(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl From<crate::Error> for KerberosError {
    fn from(error: crate::Error) -> Self {
        KerberosError::InvalidFormat(error)
    }
}

impl From<crate::ErrorKind> for KerberosError {
    fn from(kind: crate::ErrorKind) -> Self {
        KerberosError::InvalidFormat(kind.into())
    }
}

impl From<KdcClientError> for KerberosError {
    fn from(error: KdcClientError) -> Self {
        KerberosError::Kdc(error)
    }
}

impl From<CredentialError> for KerberosError {
    fn from(error: CredentialError) -> Self {
        KerberosError::UnsupportedPackage(error)
    }
}

impl From<TransportError> for KerberosError {
    fn from(error: TransportError) -> Self {
        KerberosError::Transport(error)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KdcClientError {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

#[cfg(feature = "std")]
impl std::error::Error for KerberosError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KerberosError::InvalidFormat(error) => Some(error),
            KerberosError::Kdc(error) => Some(error),
            KerberosError::UnsupportedPackage(error) => Some(error),
            KerberosError::Transport(error) => Some(error),
        }
    }
}
