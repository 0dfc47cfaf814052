use pkix_asn1::oid::known;
use pkix_asn1::{Block, Decoder, Integer, PkiObject};
use pkix_types::{PkiError, SchemaError};

use crate::x509::SubjectPublicKeyInfo;

/// PKCS#1 RSA public key (RFC 8017 §A.1.1).
///
/// ```text
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub modulus: Integer,
    pub public_exponent: Integer,
}

const CONTEXT: &str = "RSAPublicKey";

impl RsaPublicKey {
    pub fn new(modulus: Integer, public_exponent: Integer) -> Self {
        Self {
            modulus,
            public_exponent,
        }
    }

    /// Size of the modulus in bits.
    pub fn bit_len(&self) -> u64 {
        self.modulus.to_bigint().bits()
    }
}

impl PkiObject for RsaPublicKey {
    const PEM_LABEL: Option<&'static str> = Some("RSA PUBLIC KEY");

    fn to_asn1(&self) -> Block {
        Block::sequence(vec![
            Block::integer(self.modulus.clone()),
            Block::integer(self.public_exponent.clone()),
        ])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence(CONTEXT, block)?;
        let modulus = d.read_integer("modulus")?.clone();
        let public_exponent = d.read_integer("publicExponent")?.clone();
        d.finish()?;
        if modulus.is_negative() || modulus.is_zero() {
            return Err(SchemaError::InvalidValue {
                context: CONTEXT,
                reason: "modulus must be positive".into(),
            });
        }
        Ok(Self {
            modulus,
            public_exponent,
        })
    }
}

impl SubjectPublicKeyInfo {
    /// Decode the PKCS#1 key inside an `rsaEncryption` SPKI.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey, PkiError> {
        if self.algorithm.algorithm != known::rsa_encryption() {
            return Err(SchemaError::InvalidValue {
                context: "SubjectPublicKeyInfo",
                reason: format!("{} is not an RSA key", self.algorithm.algorithm),
            }
            .into());
        }
        RsaPublicKey::from_der(self.public_key_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_small_key() {
        let key = RsaPublicKey::new(Integer::from(0xC5u32), Integer::from(65537u32));
        let der = key.to_der();
        assert_eq!(der, hex!("30 09 02 02 00 C5 02 03 01 00 01"));
        let back = RsaPublicKey::from_der(&der).unwrap();
        assert_eq!(back, key);
        assert_eq!(back.bit_len(), 8);
        assert_eq!(RsaPublicKey::pem_label(), "RSA PUBLIC KEY");
    }

    #[test]
    fn test_from_spki() {
        let key = RsaPublicKey::new(Integer::from(0xC5u32), Integer::from(3u32));
        let spki = SubjectPublicKeyInfo::new(
            crate::x509::AlgorithmIdentifier::with_null_parameters(known::rsa_encryption()),
            key.to_der(),
        );
        assert_eq!(spki.rsa_public_key().unwrap(), key);

        let ec = SubjectPublicKeyInfo::new(
            crate::x509::AlgorithmIdentifier::new(known::ec_public_key(), None),
            vec![4; 65],
        );
        assert!(ec.rsa_public_key().is_err());
    }

    #[test]
    fn test_negative_modulus() {
        assert!(RsaPublicKey::from_der(&hex!("30 06 02 01 85 02 01 03")).is_err());
    }
}
