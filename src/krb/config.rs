use super::{EncryptionKey, EncryptionType};
use crate::TaggedValue;
use rand::{CryptoRng, RngCore};

/// `cksumtype` of the GSS authenticator checksum (RFC 4121 §4.1.1).
pub const GSS_CHECKSUM_TYPE: i32 = 0x8003;

/// Context flags carried in the authenticator checksum (RFC 4121 §4.1.1.1, RFC 4757 §7.1).
pub mod gss_flags {
    pub const DELEG: u32 = 0x0001;
    pub const MUTUAL: u32 = 0x0002;
    pub const REPLAY: u32 = 0x0004;
    pub const SEQUENCE: u32 = 0x0008;
    pub const CONF: u32 = 0x0010;
    pub const INTEG: u32 = 0x0020;
    pub const DCE_STYLE: u32 = 0x1000;
    pub const IDENTIFY: u32 = 0x2000;
    pub const EXTENDED_ERROR: u32 = 0x4000;
}

/// Client-side inputs for building an AP-REQ authenticator.
#[derive(Clone, Debug, Default)]
pub struct ClientAuthContextConfig {
    /// Use exactly this sub-session key. Wins over `sub_key_type`.
    pub sub_session_key: Option<EncryptionKey>,
    /// Generate a sub-session key of this type.
    pub sub_key_type: Option<EncryptionType>,
    /// MD5 of the channel bindings, placed in the checksum `Bnd` field.
    pub channel_binding_hash: Option<[u8; 16]>,
}

/// Where the authenticator's sub-session key comes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionKeySource<'a> {
    Explicit(&'a EncryptionKey),
    Generate(EncryptionType),
    /// No sub-key: the protocol falls back to the ticket session key.
    ProtocolDefault,
}

impl ClientAuthContextConfig {
    pub fn session_key_source(&self) -> SessionKeySource<'_> {
        match (&self.sub_session_key, self.sub_key_type) {
            (Some(key), _) => SessionKeySource::Explicit(key),
            (None, Some(etype)) => SessionKeySource::Generate(etype),
            (None, None) => SessionKeySource::ProtocolDefault,
        }
    }

    /// The sub-session key to put in the authenticator, drawing a new one from `rng` when
    /// only a type was configured.
    pub fn resolve_sub_key<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Option<EncryptionKey> {
        match self.session_key_source() {
            SessionKeySource::Explicit(key) => Some(key.clone()),
            SessionKeySource::Generate(etype) => {
                debug!("generating {} sub-session key", etype);
                Some(EncryptionKey::generate(etype, rng))
            }
            SessionKeySource::ProtocolDefault => None,
        }
    }

    /// Checksum body: `Lgth` (16), `Bnd` and `Flags`, integers little-endian.
    pub fn authenticator_checksum(&self, flags: u32) -> [u8; 24] {
        let mut checksum = [0u8; 24];
        checksum[..4].copy_from_slice(&16u32.to_le_bytes());
        if let Some(hash) = &self.channel_binding_hash {
            checksum[4..20].copy_from_slice(hash);
        }
        checksum[20..].copy_from_slice(&flags.to_le_bytes());
        checksum
    }

    /// `Checksum ::= SEQUENCE { cksumtype [0] Int32, checksum [1] OCTET STRING }` wrapping
    /// [`ClientAuthContextConfig::authenticator_checksum`].
    pub fn authenticator_checksum_value(&self, flags: u32) -> TaggedValue {
        TaggedValue::sequence(alloc::vec![
            TaggedValue::explicit(0, TaggedValue::integer(i64::from(GSS_CHECKSUM_TYPE))),
            TaggedValue::explicit(1, TaggedValue::octet_string(self.authenticator_checksum(flags).to_vec())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::{gss_flags, ClientAuthContextConfig, SessionKeySource};
    use crate::krb::{EncryptionKey, EncryptionType};
    use crate::{parse, Encodable};
    use hex_literal::hex;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn explicit_key_wins() {
        let key = EncryptionKey::new(18, [7u8; 32].to_vec());
        let config = ClientAuthContextConfig {
            sub_session_key: Some(key.clone()),
            sub_key_type: Some(EncryptionType::Rc4Hmac),
            ..Default::default()
        };
        assert_eq!(config.session_key_source(), SessionKeySource::Explicit(&key));

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(config.resolve_sub_key(&mut rng), Some(key));
    }

    #[test]
    fn generated_key() {
        let config = ClientAuthContextConfig {
            sub_key_type: Some(EncryptionType::Aes256CtsHmacSha196),
            ..Default::default()
        };
        assert_eq!(
            config.session_key_source(),
            SessionKeySource::Generate(EncryptionType::Aes256CtsHmacSha196)
        );

        let mut rng = StdRng::seed_from_u64(2);
        let first = config.resolve_sub_key(&mut rng).unwrap();
        let second = config.resolve_sub_key(&mut rng).unwrap();
        assert_eq!(first.keytype(), 18);
        assert_eq!(first.as_bytes().len(), 32);
        assert_ne!(first, second);
    }

    #[test]
    fn protocol_default() {
        let config = ClientAuthContextConfig::default();
        assert_eq!(config.session_key_source(), SessionKeySource::ProtocolDefault);
        assert!(config.resolve_sub_key(&mut StdRng::seed_from_u64(3)).is_none());
    }

    #[test]
    fn checksum_without_bindings() {
        let config = ClientAuthContextConfig::default();
        let flags = gss_flags::MUTUAL | gss_flags::INTEG | gss_flags::EXTENDED_ERROR;
        assert_eq!(
            config.authenticator_checksum(flags),
            hex!("10 00 00 00 00000000000000000000000000000000 22 40 00 00")
        );
    }

    #[test]
    fn checksum_with_bindings() {
        let config = ClientAuthContextConfig {
            channel_binding_hash: Some(hex!("00112233445566778899AABBCCDDEEFF")),
            ..Default::default()
        };
        let checksum = config.authenticator_checksum(gss_flags::CONF);
        assert_eq!(&checksum[4..20], &hex!("00112233445566778899AABBCCDDEEFF"));
        assert_eq!(&checksum[20..], &[0x10, 0, 0, 0]);

        let value = config.authenticator_checksum_value(gss_flags::CONF);
        let parsed = &parse(&value.to_vec().unwrap()).unwrap()[0];
        assert_eq!(parsed.child_integer(0).unwrap().to_i64(), 0x8003);
        assert_eq!(parsed.child_octet_string(1).unwrap(), &checksum[..]);
    }
}
