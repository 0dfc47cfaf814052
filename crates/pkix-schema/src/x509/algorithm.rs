use pkix_asn1::{Block, Decoder, Oid, PkiObject};
use pkix_types::SchemaError;

/// An algorithm OID with optional parameters.
///
/// ```text
/// AlgorithmIdentifier ::= SEQUENCE {
///     algorithm   OBJECT IDENTIFIER,
///     parameters  ANY DEFINED BY algorithm OPTIONAL
/// }
/// ```
///
/// Parameters are kept as a tree so that absent and explicit NULL
/// parameters stay distinguishable and re-encode as they arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: Oid,
    pub parameters: Option<Block>,
}

impl AlgorithmIdentifier {
    pub fn new(algorithm: Oid, parameters: Option<Block>) -> Self {
        Self {
            algorithm,
            parameters,
        }
    }

    /// Identifier with explicit NULL parameters, as PKCS#1 algorithms use.
    pub fn with_null_parameters(algorithm: Oid) -> Self {
        Self::new(algorithm, Some(Block::null()))
    }

    /// The parameters when they are an OID, e.g. an EC named curve.
    pub fn parameters_oid(&self) -> Option<&Oid> {
        self.parameters.as_ref().and_then(Block::as_oid)
    }
}

impl PkiObject for AlgorithmIdentifier {
    fn to_asn1(&self) -> Block {
        let mut fields = vec![Block::oid(self.algorithm.clone())];
        fields.extend(self.parameters.clone());
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("AlgorithmIdentifier", block)?;
        let algorithm = d.read_oid("algorithm")?.clone();
        let parameters = d.read_if(|_| true).cloned();
        d.finish()?;
        Ok(Self {
            algorithm,
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use pkix_asn1::oid::known;

    #[test]
    fn test_ecdsa_without_parameters() {
        let der = hex!("30 0A 06 08 2A 86 48 CE 3D 04 03 02");
        let alg = AlgorithmIdentifier::from_der(&der).unwrap();
        assert_eq!(alg.algorithm, known::ecdsa_with_sha256());
        assert!(alg.parameters.is_none());
        assert_eq!(alg.to_der(), der);
    }

    #[test]
    fn test_null_parameters_survive() {
        let alg = AlgorithmIdentifier::with_null_parameters(known::sha256_with_rsa_encryption());
        let der = alg.to_der();
        assert_eq!(der, hex!("30 0D 06 09 2A 86 48 86 F7 0D 01 01 0B 05 00"));
        let back = AlgorithmIdentifier::from_der(&der).unwrap();
        assert_eq!(back.parameters, Some(Block::null()));
    }

    #[test]
    fn test_curve_parameter() {
        let alg = AlgorithmIdentifier::new(known::ec_public_key(), Some(Block::oid(known::prime256v1())));
        assert_eq!(alg.parameters_oid(), Some(&known::prime256v1()));
        assert_eq!(AlgorithmIdentifier::pem_label(), "ALGORITHM IDENTIFIER");
    }

    #[test]
    fn test_rejects_extra_fields() {
        let der = hex!("30 07 06 01 2A 05 00 05 00");
        assert!(AlgorithmIdentifier::from_der(&der).is_err());
        assert!(AlgorithmIdentifier::from_der(&hex!("30 02 05 00")).is_err());
    }
}
