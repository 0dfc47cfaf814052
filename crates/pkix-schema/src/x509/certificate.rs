//! Certificate envelope (RFC 5280 §4.1).

use pkix_asn1::asn1::tags;
use pkix_asn1::oid::known;
use pkix_asn1::{BitString, Block, Decoder, Integer, Oid, PkiObject};
use pkix_types::{PkiError, SchemaError, Tag};

use super::algorithm::AlgorithmIdentifier;
use super::extensions::{self, BasicConstraints, Extension, Extensions, KeyUsage};
use super::general_name::GeneralNames;
use super::name::Name;
use super::spki::SubjectPublicKeyInfo;
use super::time::Validity;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// `Version ::= INTEGER { v1(0), v2(1), v3(2) }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    #[default]
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl Version {
    pub(crate) fn from_block(block: &Block, context: &'static str) -> Result<Self, SchemaError> {
        block.expect_integer(context)?;
        match block.numeric_value() {
            Some(0) => Ok(Version::V1),
            Some(1) => Ok(Version::V2),
            Some(2) => Ok(Version::V3),
            other => Err(SchemaError::InvalidValue {
                context,
                reason: format!("unsupported version {other:?}"),
            }),
        }
    }

    pub(crate) fn to_block(self) -> Block {
        Block::integer(self as u8)
    }
}

// ---------------------------------------------------------------------------
// TBSCertificate
// ---------------------------------------------------------------------------

/// The signed part of a certificate.
///
/// ```text
/// TBSCertificate ::= SEQUENCE {
///     version         [0]  EXPLICIT Version DEFAULT v1,
///     serialNumber         CertificateSerialNumber,
///     signature            AlgorithmIdentifier,
///     issuer               Name,
///     validity             Validity,
///     subject              Name,
///     subjectPublicKeyInfo SubjectPublicKeyInfo,
///     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
///     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
///     extensions      [3]  EXPLICIT Extensions OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertificate {
    pub version: Version,
    pub serial_number: Integer,
    pub signature: AlgorithmIdentifier,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub issuer_unique_id: Option<BitString>,
    pub subject_unique_id: Option<BitString>,
    pub extensions: Option<Extensions>,
}

const TBS: &str = "TBSCertificate";

fn unique_id(block: &Block) -> Result<BitString, SchemaError> {
    Ok(block
        .reinterpret_implicit(tags::BIT_STRING)?
        .expect_bit_string(TBS)?
        .clone())
}

impl PkiObject for TbsCertificate {
    fn to_asn1(&self) -> Block {
        let mut fields = Vec::with_capacity(10);
        if self.version != Version::V1 {
            fields.push(Block::explicit(0, self.version.to_block()));
        }
        fields.push(Block::integer(self.serial_number.clone()));
        fields.push(self.signature.to_asn1());
        fields.push(self.issuer.to_asn1());
        fields.push(self.validity.to_asn1());
        fields.push(self.subject.to_asn1());
        fields.push(self.subject_public_key_info.to_asn1());
        if let Some(id) = &self.issuer_unique_id {
            fields.push(Block::implicit(1, Block::bit_string(id.clone())));
        }
        if let Some(id) = &self.subject_unique_id {
            fields.push(Block::implicit(2, Block::bit_string(id.clone())));
        }
        if let Some(exts) = &self.extensions {
            fields.push(Block::explicit(3, exts.to_asn1()));
        }
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence(TBS, block)?;
        let version = match d.try_read_explicit(0)? {
            Some(v) => Version::from_block(v, TBS)?,
            None => Version::V1,
        };
        let serial_number = d.read_integer("serialNumber")?.clone();
        let signature = AlgorithmIdentifier::from_asn1(d.read("signature")?)?;
        let issuer = Name::from_asn1(d.read("issuer")?)?;
        let validity = Validity::from_asn1(d.read("validity")?)?;
        let subject = Name::from_asn1(d.read("subject")?)?;
        let subject_public_key_info = SubjectPublicKeyInfo::from_asn1(d.read("subjectPublicKeyInfo")?)?;
        let issuer_unique_id = d.try_read_context_specific(1).map(unique_id).transpose()?;
        let subject_unique_id = d.try_read_context_specific(2).map(unique_id).transpose()?;
        let extensions = d
            .try_read_explicit(3)?
            .map(Extensions::from_asn1)
            .transpose()?;
        d.finish()?;

        if version < Version::V2 && (issuer_unique_id.is_some() || subject_unique_id.is_some()) {
            return Err(SchemaError::InvalidValue {
                context: TBS,
                reason: "unique identifiers require v2 or later".into(),
            });
        }
        if version < Version::V3 && extensions.is_some() {
            return Err(SchemaError::InvalidValue {
                context: TBS,
                reason: "extensions require v3".into(),
            });
        }

        Ok(Self {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id,
            subject_unique_id,
            extensions,
        })
    }
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

/// An X.509 certificate.
///
/// ```text
/// Certificate ::= SEQUENCE {
///     tbsCertificate       TBSCertificate,
///     signatureAlgorithm   AlgorithmIdentifier,
///     signatureValue       BIT STRING
/// }
/// ```
///
/// The signature is carried, not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub tbs_certificate: TbsCertificate,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature_value: BitString,
}

impl Certificate {
    pub fn serial_number(&self) -> &Integer {
        &self.tbs_certificate.serial_number
    }

    pub fn issuer(&self) -> &Name {
        &self.tbs_certificate.issuer
    }

    pub fn subject(&self) -> &Name {
        &self.tbs_certificate.subject
    }

    pub fn validity(&self) -> &Validity {
        &self.tbs_certificate.validity
    }

    pub fn public_key(&self) -> &SubjectPublicKeyInfo {
        &self.tbs_certificate.subject_public_key_info
    }

    pub fn is_self_issued(&self) -> bool {
        self.issuer() == self.subject()
    }

    pub fn extension(&self, oid: &Oid) -> Option<&Extension> {
        extensions::find(self.tbs_certificate.extensions.as_ref(), oid)
    }

    /// Decode the extension with this OID as `T`, if present.
    pub fn extension_value<T: PkiObject>(&self, oid: &Oid) -> Result<Option<T>, PkiError> {
        extensions::decode_ext(self.tbs_certificate.extensions.as_ref(), oid)
    }

    pub fn subject_alt_names(&self) -> Result<Option<GeneralNames>, PkiError> {
        self.extension_value(&known::subject_alt_name())
    }

    pub fn basic_constraints(&self) -> Result<Option<BasicConstraints>, PkiError> {
        self.extension_value(&known::basic_constraints())
    }

    pub fn key_usage(&self) -> Result<Option<KeyUsage>, PkiError> {
        self.extension_value(&known::key_usage())
    }

    /// True if BasicConstraints marks this certificate as a CA.
    pub fn is_ca(&self) -> Result<bool, PkiError> {
        Ok(self.basic_constraints()?.is_some_and(|bc| bc.ca))
    }

    /// Critical extensions this crate has no payload type for.
    pub fn unhandled_critical_extensions(&self) -> impl Iterator<Item = &Extension> {
        self.tbs_certificate
            .extensions
            .iter()
            .flat_map(|exts| exts.iter())
            .filter(|ext| ext.critical && !extensions::is_known(&ext.extn_id))
    }
}

impl PkiObject for Certificate {
    const PEM_LABEL: Option<&'static str> = Some("CERTIFICATE");

    fn to_asn1(&self) -> Block {
        Block::sequence(vec![
            self.tbs_certificate.to_asn1(),
            self.signature_algorithm.to_asn1(),
            Block::bit_string(self.signature_value.clone()),
        ])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("Certificate", block)?;
        let tbs_certificate = TbsCertificate::from_asn1(d.read("tbsCertificate")?)?;
        let signature_algorithm = AlgorithmIdentifier::from_asn1(d.read("signatureAlgorithm")?)?;
        let signature_value = d.read_bit_string("signatureValue")?.clone();
        d.finish()?;
        if signature_algorithm != tbs_certificate.signature {
            log::warn!(
                "certificate signatureAlgorithm {} differs from the TBS signature field {}",
                signature_algorithm.algorithm,
                tbs_certificate.signature.algorithm
            );
        }
        Ok(Self {
            tbs_certificate,
            signature_algorithm,
            signature_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::{GeneralName, Time};
    use pkix_asn1::Asn1Time;

    fn sample_tbs() -> TbsCertificate {
        let name = Name::default().with(known::common_name(), Block::utf8_string("test"));
        let start = Asn1Time::new(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Asn1Time::new(2054, 1, 1, 0, 0, 0).unwrap();
        TbsCertificate {
            version: Version::V3,
            serial_number: Integer::from_hex("00C0FFEE123456789ABCDEF0").unwrap(),
            signature: AlgorithmIdentifier::new(known::ecdsa_with_sha256(), None),
            issuer: name.clone(),
            validity: Validity::new(Time::new(start), Time::new(end)),
            subject: name,
            subject_public_key_info: SubjectPublicKeyInfo::new(
                AlgorithmIdentifier::new(known::ed25519(), None),
                vec![0x11; 32],
            ),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(
                vec![
                    Extension::new(
                        known::basic_constraints(),
                        true,
                        &BasicConstraints {
                            ca: true,
                            path_len_constraint: None,
                        },
                    ),
                    Extension::new(
                        known::subject_alt_name(),
                        false,
                        &GeneralNames::new(vec![GeneralName::dns_name("test").unwrap()]),
                    ),
                ]
                .into_iter()
                .collect(),
            ),
        }
    }

    fn sample() -> Certificate {
        Certificate {
            tbs_certificate: sample_tbs(),
            signature_algorithm: AlgorithmIdentifier::new(known::ecdsa_with_sha256(), None),
            signature_value: BitString::from_bytes(vec![0x30, 0x00]),
        }
    }

    #[test]
    fn test_round_trip() {
        let cert = sample();
        let der = cert.to_der();
        let back = Certificate::from_der(&der).unwrap();
        assert_eq!(back, cert);
        assert_eq!(back.to_der(), der);
        assert!(back.is_self_issued());
        assert!(back.is_ca().unwrap());
        assert_eq!(back.serial_number().to_hex(), "C0FFEE123456789ABCDEF0");
        assert!(matches!(back.validity().not_after, Time::GeneralizedTime(_)));
        let sans = back.subject_alt_names().unwrap().unwrap();
        assert_eq!(sans.as_slice()[0].as_dns_name(), Some("test"));
        assert!(back.key_usage().unwrap().is_none());
        assert_eq!(back.unhandled_critical_extensions().count(), 0);
    }

    #[test]
    fn test_v1_omits_version() {
        let mut tbs = sample_tbs();
        tbs.version = Version::V1;
        tbs.extensions = None;
        let der = tbs.to_der();
        // serial number follows the SEQUENCE header directly
        assert_eq!(der[3], 0x02);
        assert_eq!(TbsCertificate::from_der(&der).unwrap().version, Version::V1);
    }

    #[test]
    fn test_extensions_require_v3() {
        let mut tbs = sample_tbs();
        tbs.version = Version::V2;
        let err = TbsCertificate::from_der(&tbs.to_der()).unwrap_err();
        assert_eq!(err.to_string(), "schema error: TBSCertificate: extensions require v3");
    }

    #[test]
    fn test_unknown_critical_extension() {
        let mut cert = sample();
        let exts = cert.tbs_certificate.extensions.take().unwrap_or_default();
        let odd = Extension {
            extn_id: Oid::new(&[1, 2, 3, 4]).unwrap(),
            critical: true,
            extn_value: vec![0x05, 0x00],
        };
        cert.tbs_certificate.extensions = Some(exts.with(odd.clone()));
        let unhandled: Vec<&Extension> = cert.unhandled_critical_extensions().collect();
        assert_eq!(unhandled, [&odd]);
        assert_eq!(cert.extension(&odd.extn_id), Some(&odd));
    }

    #[test]
    fn test_pem_label() {
        let pem = sample().to_pem();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert_eq!(Certificate::from_pem(&pem).unwrap(), sample());
    }
}
