use pkix_asn1::{BitString, Block, Decoder, Oid, PkiObject};
use pkix_types::SchemaError;

use super::algorithm::AlgorithmIdentifier;

/// A public key with its algorithm (RFC 5280 §4.1.2.7).
///
/// ```text
/// SubjectPublicKeyInfo ::= SEQUENCE {
///     algorithm            AlgorithmIdentifier,
///     subjectPublicKey     BIT STRING
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    pub subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            subject_public_key: BitString::from_bytes(public_key),
        }
    }

    /// The key octets (an EC point, a PKCS#1 RSAPublicKey, ...).
    pub fn public_key_bytes(&self) -> &[u8] {
        self.subject_public_key.as_bytes()
    }

    /// Named curve of an EC key.
    pub fn curve(&self) -> Option<&Oid> {
        self.algorithm.parameters_oid()
    }
}

impl PkiObject for SubjectPublicKeyInfo {
    const PEM_LABEL: Option<&'static str> = Some("PUBLIC KEY");

    fn to_asn1(&self) -> Block {
        Block::sequence(vec![
            self.algorithm.to_asn1(),
            Block::bit_string(self.subject_public_key.clone()),
        ])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("SubjectPublicKeyInfo", block)?;
        let algorithm = AlgorithmIdentifier::from_asn1(d.read("algorithm")?)?;
        let subject_public_key = d.read_bit_string("subjectPublicKey")?.clone();
        d.finish()?;
        Ok(Self {
            algorithm,
            subject_public_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkix_asn1::oid::known;

    const SPKI_PEM: &str = "-----BEGIN PUBLIC KEY-----
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEG6x0NimgpHddDgb8jE1A0lN1A+Gc
+UO8RvDR7/J6pnpG/RXDIvBYqlBoBg4fZEIo4IXEV2B4s8RzQ9rDQ1j9Ww==
-----END PUBLIC KEY-----
";

    #[test]
    fn test_ec_public_key() {
        let spki = SubjectPublicKeyInfo::from_pem(SPKI_PEM).unwrap();
        assert_eq!(spki.algorithm.algorithm, known::ec_public_key());
        assert_eq!(spki.curve(), Some(&known::prime256v1()));
        assert_eq!(spki.public_key_bytes().len(), 65);
        assert_eq!(spki.public_key_bytes()[0], 0x04);
        assert_eq!(spki.to_pem(), SPKI_PEM);
    }

    #[test]
    fn test_label_is_checked() {
        let pem = SPKI_PEM.replace("PUBLIC KEY", "CERTIFICATE");
        assert!(SubjectPublicKeyInfo::from_pem(&pem).is_err());
    }
}
