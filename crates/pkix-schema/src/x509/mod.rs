//! X.509 certificate and CRL structures (RFC 5280).

mod algorithm;
mod attribute;
mod certificate;
mod crl;
mod extensions;
mod general_name;
mod name;
mod spki;
mod time;

pub use algorithm::AlgorithmIdentifier;
pub use attribute::Attribute;
pub use certificate::{Certificate, TbsCertificate, Version};
pub use crl::{CertificateList, RevokedCertificate, TbsCertList};
pub use extensions::{
    AuthorityKeyIdentifier, BasicConstraints, CrlReason, ExtendedKeyUsage, Extension, Extensions,
    KeyUsage, SubjectKeyIdentifier,
};
pub use general_name::{GeneralName, GeneralNames};
pub use name::{AttributeTypeAndValue, Name, RelativeDistinguishedName};
pub use spki::SubjectPublicKeyInfo;
pub use time::{Time, Validity};
