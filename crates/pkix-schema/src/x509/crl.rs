//! Certificate revocation lists (RFC 5280 §5).

use pkix_asn1::asn1::tags;
use pkix_asn1::oid::known;
use pkix_asn1::{BitString, Block, Decoder, Integer, Oid, PkiObject, PkiSequence};
use pkix_types::{PkiError, SchemaError, Tag, TagClass};

use super::algorithm::AlgorithmIdentifier;
use super::certificate::Version;
use super::extensions::{self, CrlReason, Extension, Extensions};
use super::name::Name;
use super::time::Time;

/// One entry of the revoked list.
///
/// ```text
/// SEQUENCE {
///     userCertificate         CertificateSerialNumber,
///     revocationDate          Time,
///     crlEntryExtensions      Extensions OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedCertificate {
    pub user_certificate: Integer,
    pub revocation_date: Time,
    pub crl_entry_extensions: Option<Extensions>,
}

impl RevokedCertificate {
    pub fn new(user_certificate: Integer, revocation_date: Time) -> Self {
        Self {
            user_certificate,
            revocation_date,
            crl_entry_extensions: None,
        }
    }

    /// The CRLReason entry extension, if present.
    pub fn reason(&self) -> Result<Option<CrlReason>, PkiError> {
        extensions::decode_ext(self.crl_entry_extensions.as_ref(), &known::crl_reason())
    }
}

impl PkiObject for RevokedCertificate {
    fn to_asn1(&self) -> Block {
        let mut fields = vec![
            Block::integer(self.user_certificate.clone()),
            self.revocation_date.to_asn1(),
        ];
        fields.extend(self.crl_entry_extensions.as_ref().map(PkiObject::to_asn1));
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("RevokedCertificate", block)?;
        let user_certificate = d.read_integer("userCertificate")?.clone();
        let revocation_date = Time::from_asn1(d.read("revocationDate")?)?;
        let crl_entry_extensions = if d.is_empty() {
            None
        } else {
            Some(Extensions::from_asn1(d.read("crlEntryExtensions")?)?)
        };
        d.finish()?;
        Ok(Self {
            user_certificate,
            revocation_date,
            crl_entry_extensions,
        })
    }
}

/// The signed part of a CRL.
///
/// ```text
/// TBSCertList ::= SEQUENCE {
///     version                 Version OPTIONAL,  -- v2 if present
///     signature               AlgorithmIdentifier,
///     issuer                  Name,
///     thisUpdate              Time,
///     nextUpdate              Time OPTIONAL,
///     revokedCertificates     SEQUENCE OF SEQUENCE { ... } OPTIONAL,
///     crlExtensions           [0] EXPLICIT Extensions OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertList {
    pub version: Option<Version>,
    pub signature: AlgorithmIdentifier,
    pub issuer: Name,
    pub this_update: Time,
    pub next_update: Option<Time>,
    pub revoked_certificates: Option<PkiSequence<RevokedCertificate>>,
    pub crl_extensions: Option<Extensions>,
}

const TBS: &str = "TBSCertList";

fn is_time(tag: Tag) -> bool {
    tag.class == TagClass::Universal
        && !tag.constructed
        && (tag.number == tags::UTC_TIME || tag.number == tags::GENERALIZED_TIME)
}

impl PkiObject for TbsCertList {
    fn to_asn1(&self) -> Block {
        let mut fields = Vec::with_capacity(7);
        fields.extend(self.version.map(Version::to_block));
        fields.push(self.signature.to_asn1());
        fields.push(self.issuer.to_asn1());
        fields.push(self.this_update.to_asn1());
        fields.extend(self.next_update.as_ref().map(PkiObject::to_asn1));
        fields.extend(self.revoked_certificates.as_ref().map(PkiObject::to_asn1));
        if let Some(exts) = &self.crl_extensions {
            fields.push(Block::explicit(0, exts.to_asn1()));
        }
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence(TBS, block)?;
        let version = d
            .read_if(|tag| tag == Tag::universal(tags::INTEGER, false))
            .map(|v| Version::from_block(v, TBS))
            .transpose()?;
        let signature = AlgorithmIdentifier::from_asn1(d.read("signature")?)?;
        let issuer = Name::from_asn1(d.read("issuer")?)?;
        let this_update = Time::from_asn1(d.read("thisUpdate")?)?;
        let next_update = d.read_if(is_time).map(Time::from_asn1).transpose()?;
        let revoked_certificates = d
            .read_if(|tag| tag == Tag::universal(tags::SEQUENCE, true))
            .map(PkiSequence::<RevokedCertificate>::from_asn1)
            .transpose()?;
        let crl_extensions = d
            .try_read_explicit(0)?
            .map(Extensions::from_asn1)
            .transpose()?;
        d.finish()?;

        if crl_extensions.is_some() && version != Some(Version::V2) {
            return Err(SchemaError::InvalidValue {
                context: TBS,
                reason: "CRL extensions require v2".into(),
            });
        }

        Ok(Self {
            version,
            signature,
            issuer,
            this_update,
            next_update,
            revoked_certificates,
            crl_extensions,
        })
    }
}

/// An X.509 CRL.
///
/// ```text
/// CertificateList ::= SEQUENCE {
///     tbsCertList          TBSCertList,
///     signatureAlgorithm   AlgorithmIdentifier,
///     signatureValue       BIT STRING
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateList {
    pub tbs_cert_list: TbsCertList,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature_value: BitString,
}

impl CertificateList {
    pub fn issuer(&self) -> &Name {
        &self.tbs_cert_list.issuer
    }

    pub fn revoked(&self) -> &[RevokedCertificate] {
        match &self.tbs_cert_list.revoked_certificates {
            Some(list) => list.as_slice(),
            None => &[],
        }
    }

    /// The entry revoking `serial`, if any.
    pub fn find_revoked(&self, serial: &Integer) -> Option<&RevokedCertificate> {
        self.revoked().iter().find(|entry| &entry.user_certificate == serial)
    }

    pub fn extension(&self, oid: &Oid) -> Option<&Extension> {
        extensions::find(self.tbs_cert_list.crl_extensions.as_ref(), oid)
    }

    /// The cRLNumber extension.
    pub fn crl_number(&self) -> Result<Option<Integer>, PkiError> {
        extensions::decode_ext(self.tbs_cert_list.crl_extensions.as_ref(), &known::crl_number())
    }
}

impl PkiObject for CertificateList {
    const PEM_LABEL: Option<&'static str> = Some("X509 CRL");

    fn to_asn1(&self) -> Block {
        Block::sequence(vec![
            self.tbs_cert_list.to_asn1(),
            self.signature_algorithm.to_asn1(),
            Block::bit_string(self.signature_value.clone()),
        ])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("CertificateList", block)?;
        let tbs_cert_list = TbsCertList::from_asn1(d.read("tbsCertList")?)?;
        let signature_algorithm = AlgorithmIdentifier::from_asn1(d.read("signatureAlgorithm")?)?;
        let signature_value = d.read_bit_string("signatureValue")?.clone();
        d.finish()?;
        Ok(Self {
            tbs_cert_list,
            signature_algorithm,
            signature_value,
        })
    }
}
