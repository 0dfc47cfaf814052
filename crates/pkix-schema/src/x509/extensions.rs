//! X.509 extensions and the payloads of the common ones.

use pkix_asn1::asn1::tags;
use pkix_asn1::oid::known;
use pkix_asn1::{BitString, Block, Decoder, Integer, Oid, PkiObject, PkiSequence};
use pkix_types::{PkiError, SchemaError, Tag};

use super::general_name::GeneralNames;

/// A single extension with its still-encoded value.
///
/// ```text
/// Extension ::= SEQUENCE {
///     extnID      OBJECT IDENTIFIER,
///     critical    BOOLEAN DEFAULT FALSE,
///     extnValue   OCTET STRING
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub extn_id: Oid,
    pub critical: bool,
    pub extn_value: Vec<u8>,
}

pub type Extensions = PkiSequence<Extension>;

impl Extension {
    /// Extension carrying the DER encoding of `value`.
    pub fn new<T: PkiObject>(extn_id: Oid, critical: bool, value: &T) -> Self {
        Self {
            extn_id,
            critical,
            extn_value: value.to_der(),
        }
    }

    /// Decode the value as `T`.
    pub fn decode<T: PkiObject>(&self) -> Result<T, PkiError> {
        T::from_der(&self.extn_value)
    }
}

impl PkiObject for Extension {
    fn to_asn1(&self) -> Block {
        let mut fields = vec![Block::oid(self.extn_id.clone())];
        // DER omits a DEFAULT value
        if self.critical {
            fields.push(Block::boolean(true));
        }
        fields.push(Block::octet_string(self.extn_value.clone()));
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("Extension", block)?;
        let extn_id = d.read_oid("extnID")?.clone();
        let critical = d.read_default_false()?;
        let extn_value = d.read_octet_string("extnValue")?.to_vec();
        d.finish()?;
        Ok(Self {
            extn_id,
            critical,
            extn_value,
        })
    }
}

/// The first extension with this OID.
pub(crate) fn find<'a>(extensions: Option<&'a Extensions>, oid: &Oid) -> Option<&'a Extension> {
    extensions?.iter().find(|ext| &ext.extn_id == oid)
}

/// Decode the first extension with this OID, if present.
pub(crate) fn decode_ext<T: PkiObject>(
    extensions: Option<&Extensions>,
    oid: &Oid,
) -> Result<Option<T>, PkiError> {
    find(extensions, oid).map(Extension::decode).transpose()
}

// ---------------------------------------------------------------------------
// Extension payloads
// ---------------------------------------------------------------------------

/// BasicConstraints (RFC 5280 §4.2.1.9).
///
/// `SEQUENCE { cA BOOLEAN DEFAULT FALSE, pathLenConstraint INTEGER (0..MAX) OPTIONAL }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<u32>,
}

impl PkiObject for BasicConstraints {
    fn to_asn1(&self) -> Block {
        let mut fields = Vec::new();
        if self.ca {
            fields.push(Block::boolean(true));
        }
        if let Some(len) = self.path_len_constraint {
            fields.push(Block::integer(len));
        }
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("BasicConstraints", block)?;
        let ca = d.read_default_false()?;
        let path_len_constraint = match d.read_if(|tag| tag == Tag::universal(tags::INTEGER, false)) {
            Some(block) => {
                let value = block.expect_integer("BasicConstraints")?;
                let len = value
                    .to_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| SchemaError::InvalidValue {
                        context: "BasicConstraints",
                        reason: format!("pathLenConstraint {value} out of range"),
                    })?;
                Some(len)
            }
            None => None,
        };
        d.finish()?;
        Ok(Self {
            ca,
            path_len_constraint,
        })
    }
}

/// KeyUsage (RFC 5280 §4.2.1.3) as a bit mask; bit `n` of the named bit
/// list is `1 << n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyUsage(pub u16);

impl KeyUsage {
    pub const DIGITAL_SIGNATURE: u16 = 1 << 0;
    pub const NON_REPUDIATION: u16 = 1 << 1;
    pub const KEY_ENCIPHERMENT: u16 = 1 << 2;
    pub const DATA_ENCIPHERMENT: u16 = 1 << 3;
    pub const KEY_AGREEMENT: u16 = 1 << 4;
    pub const KEY_CERT_SIGN: u16 = 1 << 5;
    pub const CRL_SIGN: u16 = 1 << 6;
    pub const ENCIPHER_ONLY: u16 = 1 << 7;
    pub const DECIPHER_ONLY: u16 = 1 << 8;

    pub fn has(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }
}

impl PkiObject for KeyUsage {
    fn to_asn1(&self) -> Block {
        let bits: Vec<bool> = (0..9).map(|i| self.0 & (1 << i) != 0).collect();
        Block::bit_string(BitString::from_bits(&bits))
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let bits = block.expect_bit_string("KeyUsage")?;
        let mask = (0..bits.bit_len().min(16))
            .filter(|&i| bits.bit(i))
            .fold(0u16, |mask, i| mask | (1 << i));
        Ok(KeyUsage(mask))
    }
}

/// SubjectKeyIdentifier (RFC 5280 §4.2.1.2): `OCTET STRING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl PkiObject for SubjectKeyIdentifier {
    fn to_asn1(&self) -> Block {
        Block::octet_string(self.0.clone())
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        Ok(Self(block.expect_octet_string("SubjectKeyIdentifier")?.to_vec()))
    }
}

/// AuthorityKeyIdentifier (RFC 5280 §4.2.1.1).
///
/// ```text
/// AuthorityKeyIdentifier ::= SEQUENCE {
///     keyIdentifier             [0] KeyIdentifier           OPTIONAL,
///     authorityCertIssuer       [1] GeneralNames            OPTIONAL,
///     authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub authority_cert_issuer: Option<GeneralNames>,
    pub authority_cert_serial_number: Option<Integer>,
}

impl PkiObject for AuthorityKeyIdentifier {
    fn to_asn1(&self) -> Block {
        let mut fields = Vec::new();
        if let Some(id) = &self.key_identifier {
            fields.push(Block::implicit(0, Block::octet_string(id.clone())));
        }
        if let Some(names) = &self.authority_cert_issuer {
            fields.push(Block::implicit(1, names.to_asn1()));
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            fields.push(Block::implicit(2, Block::integer(serial.clone())));
        }
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        const CONTEXT: &str = "AuthorityKeyIdentifier";
        let mut d = Decoder::sequence(CONTEXT, block)?;
        let key_identifier = match d.try_read_context_specific(0) {
            Some(b) => Some(
                b.reinterpret_implicit(tags::OCTET_STRING)?
                    .expect_octet_string(CONTEXT)?
                    .to_vec(),
            ),
            None => None,
        };
        let authority_cert_issuer = match d.try_read_context_specific(1) {
            Some(b) => Some(GeneralNames::from_asn1(&b.reinterpret_implicit(tags::SEQUENCE)?)?),
            None => None,
        };
        let authority_cert_serial_number = match d.try_read_context_specific(2) {
            Some(b) => Some(
                b.reinterpret_implicit(tags::INTEGER)?
                    .expect_integer(CONTEXT)?
                    .clone(),
            ),
            None => None,
        };
        d.finish()?;
        Ok(Self {
            key_identifier,
            authority_cert_issuer,
            authority_cert_serial_number,
        })
    }
}

/// ExtendedKeyUsage (RFC 5280 §4.2.1.12): `SEQUENCE SIZE (1..MAX) OF KeyPurposeId`.
pub type ExtendedKeyUsage = PkiSequence<Oid>;

/// CRLReason (RFC 5280 §5.3.1), an ENUMERATED CRL entry extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrlReason {
    Unspecified = 0,
    KeyCompromise = 1,
    CaCompromise = 2,
    AffiliationChanged = 3,
    Superseded = 4,
    CessationOfOperation = 5,
    CertificateHold = 6,
    RemoveFromCrl = 8,
    PrivilegeWithdrawn = 9,
    AaCompromise = 10,
}

impl CrlReason {
    fn from_code(code: i64) -> Option<Self> {
        let reason = match code {
            0 => CrlReason::Unspecified,
            1 => CrlReason::KeyCompromise,
            2 => CrlReason::CaCompromise,
            3 => CrlReason::AffiliationChanged,
            4 => CrlReason::Superseded,
            5 => CrlReason::CessationOfOperation,
            6 => CrlReason::CertificateHold,
            8 => CrlReason::RemoveFromCrl,
            9 => CrlReason::PrivilegeWithdrawn,
            10 => CrlReason::AaCompromise,
            _ => return None,
        };
        Some(reason)
    }
}

impl PkiObject for CrlReason {
    fn to_asn1(&self) -> Block {
        Block::enumerated(*self as i64)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        block.expect_tag("CRLReason", Tag::universal(tags::ENUMERATED, false))?;
        let code = block.numeric_value();
        code.and_then(CrlReason::from_code)
            .ok_or_else(|| SchemaError::InvalidValue {
                context: "CRLReason",
                reason: format!("unknown reason code {code:?}"),
            })
    }
}

/// OIDs of the payloads above, for callers that match on `extn_id`.
pub(crate) fn is_known(oid: &Oid) -> bool {
    [
        known::basic_constraints(),
        known::key_usage(),
        known::subject_key_identifier(),
        known::authority_key_identifier(),
        known::subject_alt_name(),
        known::ext_key_usage(),
        known::crl_reason(),
    ]
    .contains(oid)
}
